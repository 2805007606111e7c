use crate::functions::{DefaultFunctions, Functions};
use crate::resolver::{EmptyResolver, Resolver};

static EMPTY_RESOLVER: EmptyResolver = EmptyResolver;
static DEFAULT_FUNCTIONS: DefaultFunctions = DefaultFunctions;

/// Read-only capabilities an evaluation runs against.
///
/// A context holds no evaluation state, so the same context (and the same AST) can be
/// used from many threads at once.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    resolver: &'a dyn Resolver,
    functions: &'a dyn Functions,
}

impl<'a> Context<'a> {
    pub fn new(resolver: &'a dyn Resolver, functions: &'a dyn Functions) -> Self {
        Self {
            resolver,
            functions,
        }
    }

    /// Context with the given resolver and the default math functions.
    pub fn with_resolver(resolver: &'a dyn Resolver) -> Self {
        Self::new(resolver, &DEFAULT_FUNCTIONS)
    }

    pub fn resolver(&self) -> &'a dyn Resolver {
        self.resolver
    }

    pub fn functions(&self) -> &'a dyn Functions {
        self.functions
    }
}

impl Default for Context<'static> {
    fn default() -> Self {
        Self::new(&EMPTY_RESOLVER, &DEFAULT_FUNCTIONS)
    }
}

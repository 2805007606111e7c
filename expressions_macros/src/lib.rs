use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, GenericArgument, ItemFn, PathArguments, PatType, Type};

/// Turns a plain Rust function into an expression-language function.
///
/// The annotated function keeps its name and body, but its signature is rewritten to
/// `fn(&Context<'_>, &[ASTNode]) -> Result<Value, EvaluationError>`. The generated
/// wrapper checks the arity, evaluates each argument expression left to right and
/// coerces it to the declared parameter type:
///
/// * `f64`, `bool`, `String` require a value of the matching tag,
/// * `Value` accepts anything,
/// * `Option<T>` marks a trailing optional parameter.
///
/// `Value`, `ASTNode`, `Context` and `EvaluationError` must be in scope at the call site.
#[proc_macro_attribute]
pub fn expression_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct Param {
    kind: Kind,
    optional: bool,
}

enum Kind {
    Number,
    Boolean,
    Text,
    Any,
}

fn expand(input: ItemFn) -> syn::Result<TokenStream2> {
    let attrs = &input.attrs;
    let vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;
    let name = fn_name.to_string();

    let mut arg_extractions = Vec::new();
    let mut required = 0usize;
    let mut seen_optional = false;

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new(arg.span(), "methods are not supported"));
        };
        let arg_name = match **pat {
            syn::Pat::Ident(ref ident) => &ident.ident,
            _ => return Err(syn::Error::new(pat.span(), "unsupported pattern")),
        };

        let param = classify(ty)?;
        if param.optional {
            seen_optional = true;
        } else if seen_optional {
            return Err(syn::Error::new(
                ty.span(),
                "required parameters must come before optional ones",
            ));
        } else {
            required += 1;
        }

        let coerce = coercion(&param.kind);
        let extract_code = if param.optional {
            quote! {
                let #arg_name = match args.get(#i) {
                    Some(arg) => {
                        let value = arg.solve(ctx)?;
                        Some(#coerce)
                    }
                    None => None,
                };
            }
        } else {
            quote! {
                let #arg_name = {
                    let value = args[#i].solve(ctx)?;
                    #coerce
                };
            }
        };
        arg_extractions.push(extract_code);
    }

    let total = input.sig.inputs.len();
    Ok(quote! {
        #(#attrs)*
        #vis fn #fn_name(ctx: &Context<'_>, args: &[ASTNode]) #fn_output {
            if args.len() < #required {
                return Err(EvaluationError::Arity {
                    name: #name.to_string(),
                    expected: #required,
                });
            }
            if args.len() > #total {
                return Err(EvaluationError::Arity {
                    name: #name.to_string(),
                    expected: #total,
                });
            }

            #(#arg_extractions)*

            #fn_body
        }
    })
}

fn classify(ty: &Type) -> syn::Result<Param> {
    let Type::Path(type_path) = ty else {
        return Err(syn::Error::new(ty.span(), "unsupported argument type"));
    };
    let Some(segment) = type_path.path.segments.last() else {
        return Err(syn::Error::new(ty.span(), "unsupported argument type"));
    };

    if segment.ident == "Option" {
        let PathArguments::AngleBracketed(generics) = &segment.arguments else {
            return Err(syn::Error::new(ty.span(), "Option needs a type argument"));
        };
        let Some(GenericArgument::Type(inner)) = generics.args.first() else {
            return Err(syn::Error::new(ty.span(), "Option needs a type argument"));
        };
        let inner = classify(inner)?;
        if inner.optional {
            return Err(syn::Error::new(ty.span(), "nested Option is not supported"));
        }
        return Ok(Param {
            kind: inner.kind,
            optional: true,
        });
    }

    let kind = match segment.ident.to_string().as_str() {
        "f64" => Kind::Number,
        "bool" => Kind::Boolean,
        "String" => Kind::Text,
        "Value" => Kind::Any,
        other => {
            return Err(syn::Error::new(
                ty.span(),
                format!("unsupported type {}", other),
            ))
        }
    };
    Ok(Param {
        kind,
        optional: false,
    })
}

fn coercion(kind: &Kind) -> TokenStream2 {
    match kind {
        Kind::Number => quote! {
            match value {
                Value::Number(n) => n,
                other => return Err(EvaluationError::TypeMismatch { value: other }),
            }
        },
        Kind::Boolean => quote! {
            match value {
                Value::Boolean(b) => b,
                other => return Err(EvaluationError::TypeMismatch { value: other }),
            }
        },
        Kind::Text => quote! {
            match value {
                Value::String(s) => s,
                other => return Err(EvaluationError::TypeMismatch { value: other }),
            }
        },
        Kind::Any => quote! { value },
    }
}

//! Derive macro for error types.
//!
//! Generates `std::fmt::Display`, `std::error::Error` and, for fields marked
//! `#[from]`, `From` conversions. Replacement for the `thiserror` crate.
//!
//! # Usage
//!
//! ```ignore
//! use based_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum CheckerError {
//!     #[error("io error: {0}")]
//!     Io(#[from] std::io::Error),
//!
//!     #[error("line {line}: {message}")]
//!     Runtime { line: i64, message: String },
//!
//!     #[error("no output")]
//!     NoOutput,
//! }
//! ```
//!
//! # Supported Features
//!
//! - Unit variants: `#[error("message")]`
//! - Tuple variants with positional args: `#[error("error: {0}")]`
//! - Struct variants with named args: `#[error("expected {expected}")]`
//! - Fields that do not appear in the message are allowed
//! - `#[from]` generates a `From` impl and reports the field as `source()`
//! - `#[source]` reports the field as `source()` without a conversion

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, Ident, Lit, Meta, Type, Variant, parse_macro_input};

/// Derives `Display` and `Error` for an enum or struct.
///
/// Each variant must have an `#[error("...")]` attribute specifying
/// the display message. Supports field interpolation using `{0}`, `{1}`
/// for tuple fields or `{field_name}` for struct fields.
pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_error_derive(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_error_derive(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (display_body, source_body, from_impls) = match &input.data {
        Data::Enum(data_enum) => {
            let variants = data_enum
                .variants
                .iter()
                .map(VariantInfo::parse)
                .collect::<syn::Result<Vec<_>>>()?;

            let display_arms = variants.iter().map(VariantInfo::display_arm);
            let source_arms = variants.iter().map(VariantInfo::source_arm);
            let from_impls = variants
                .iter()
                .filter_map(|variant| variant.from_impl(input))
                .collect::<Vec<_>>();

            (
                quote! { match self { #(#display_arms)* } },
                quote! { match self { #(#source_arms)* } },
                from_impls,
            )
        }
        Data::Struct(data_struct) => {
            let error_msg = extract_error_message(
                &input.attrs,
                &input.ident,
                &format!("type `{}`", input.ident),
            )?;
            let display_body = struct_display_body(&error_msg, &data_struct.fields);
            (display_body, quote! { ::std::option::Option::None }, Vec::new())
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Error derive does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #display_body
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {
            fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
                #source_body
            }
        }

        #(#from_impls)*
    })
}

/// A field that `source()` reports, optionally convertible through `From`.
struct SourceField<'a> {
    index: usize,
    ty: &'a Type,
    from: bool,
}

/// Per-variant data gathered before code generation.
struct VariantInfo<'a> {
    variant: &'a Variant,
    message: String,
    source: Option<SourceField<'a>>,
}

impl<'a> VariantInfo<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let message = extract_error_message(
            &variant.attrs,
            &variant.ident,
            &format!("variant `{}`", variant.ident),
        )?;

        let mut source = None;
        for (index, field) in variant.fields.iter().enumerate() {
            let from = has_attr(field, "from");
            if !from && !has_attr(field, "source") {
                continue;
            }
            if source.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field per variant may be marked #[from] or #[source]",
                ));
            }
            if from && variant.fields.len() != 1 {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[from] requires the variant to have exactly one field",
                ));
            }
            source = Some(SourceField {
                index,
                ty: &field.ty,
                from,
            });
        }

        Ok(Self {
            variant,
            message,
            source,
        })
    }

    fn ident(&self) -> &Ident {
        &self.variant.ident
    }

    fn display_arm(&self) -> TokenStream2 {
        let variant_name = self.ident();
        let error_msg = &self.message;

        match &self.variant.fields {
            Fields::Unit => quote! {
                Self::#variant_name => write!(f, #error_msg),
            },
            Fields::Unnamed(fields) => {
                let format_str = convert_positional_to_named(error_msg, fields.unnamed.len());
                let bindings = (0..fields.unnamed.len()).map(|i| {
                    let ident = format_ident!("f{}", i);
                    if mentions(&format_str, &ident.to_string()) {
                        ident.into_token_stream()
                    } else {
                        quote! { _ }
                    }
                });
                let used: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| format_ident!("f{}", i))
                    .filter(|ident| mentions(&format_str, &ident.to_string()))
                    .collect();
                quote! {
                    Self::#variant_name(#(#bindings),*) => write!(f, #format_str, #(#used = #used),*),
                }
            }
            Fields::Named(fields) => {
                let used: Vec<_> = fields
                    .named
                    .iter()
                    .filter_map(|field| field.ident.as_ref())
                    .filter(|ident| mentions(error_msg, &ident.to_string()))
                    .collect();
                quote! {
                    Self::#variant_name { #(#used,)* .. } => write!(f, #error_msg, #(#used = #used),*),
                }
            }
        }
    }

    fn source_arm(&self) -> TokenStream2 {
        let variant_name = self.ident();
        let Some(source) = &self.source else {
            return match &self.variant.fields {
                Fields::Unit => quote! { Self::#variant_name => ::std::option::Option::None, },
                Fields::Unnamed(_) => {
                    quote! { Self::#variant_name(..) => ::std::option::Option::None, }
                }
                Fields::Named(_) => {
                    quote! { Self::#variant_name { .. } => ::std::option::Option::None, }
                }
            };
        };

        let binding = format_ident!("__source");
        let pattern = match &self.variant.fields {
            Fields::Named(fields) => {
                let field = fields
                    .named
                    .iter()
                    .nth(source.index)
                    .and_then(|field| field.ident.as_ref());
                quote! { Self::#variant_name { #field: #binding, .. } }
            }
            Fields::Unnamed(fields) => {
                let slots = (0..fields.unnamed.len()).map(|i| {
                    if i == source.index {
                        binding.to_token_stream()
                    } else {
                        quote! { _ }
                    }
                });
                quote! { Self::#variant_name(#(#slots),*) }
            }
            Fields::Unit => unreachable!("unit variants have no fields"),
        };

        quote! {
            #pattern => ::std::option::Option::Some(#binding as &(dyn ::std::error::Error + 'static)),
        }
    }

    fn from_impl(&self, input: &DeriveInput) -> Option<TokenStream2> {
        let source = self.source.as_ref().filter(|source| source.from)?;
        let name = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        let variant_name = self.ident();
        let ty = source.ty;

        let construct = match &self.variant.fields {
            Fields::Named(fields) => {
                let field = fields.named.iter().next().and_then(|field| field.ident.as_ref());
                quote! { Self::#variant_name { #field: value } }
            }
            _ => quote! { Self::#variant_name(value) },
        };

        Some(quote! {
            impl #impl_generics ::std::convert::From<#ty> for #name #ty_generics #where_clause {
                fn from(value: #ty) -> Self {
                    #construct
                }
            }
        })
    }
}

/// Builds the `Display` body for a struct error type.
fn struct_display_body(error_msg: &str, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Unit => quote! {
            write!(f, #error_msg)
        },
        Fields::Named(fields) => {
            let used: Vec<_> = fields
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| mentions(error_msg, &ident.to_string()))
                .collect();
            quote! {
                write!(f, #error_msg, #(#used = self.#used),*)
            }
        }
        Fields::Unnamed(fields) => {
            let format_str = convert_positional_to_named(error_msg, fields.unnamed.len());
            let (idents, indices): (Vec<_>, Vec<_>) = (0..fields.unnamed.len())
                .map(|i| (format_ident!("f{}", i), syn::Index::from(i)))
                .filter(|(ident, _)| mentions(&format_str, &ident.to_string()))
                .unzip();
            quote! {
                write!(f, #format_str, #(#idents = self.#indices),*)
            }
        }
    }
}

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Whether `format_str` interpolates the argument `name` (`{name}` or `{name:...}`).
fn mentions(format_str: &str, name: &str) -> bool {
    format_str.contains(&format!("{{{name}}}")) || format_str.contains(&format!("{{{name}:"))
}

/// Extracts the error message from an `#[error("...")]` attribute.
fn extract_error_message<T: ToTokens>(
    attrs: &[syn::Attribute],
    target: &T,
    target_desc: &str,
) -> syn::Result<String> {
    for attr in attrs {
        if !attr.path().is_ident("error") {
            continue;
        }
        let Meta::List(meta_list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                &attr.meta,
                "invalid #[error] attribute; use #[error(\"message\")] to describe the error",
            ));
        };
        let lit = syn::parse2::<Lit>(meta_list.tokens.clone()).map_err(|_| {
            syn::Error::new_spanned(
                &attr.meta,
                "failed to parse #[error] attribute; expected a string literal like #[error(\"line {line}: {message}\")]",
            )
        })?;
        return match lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            _ => Err(syn::Error::new_spanned(
                &attr.meta,
                "invalid #[error] attribute: message must be a string literal",
            )),
        };
    }

    Err(syn::Error::new_spanned(
        target,
        format!(
            "missing #[error(\"...\")] attribute on {}; every error variant must declare a display message",
            target_desc
        ),
    ))
}

/// Converts positional format args `{0}`, `{1:?}` to named args `{f0}`, `{f1:?}`.
fn convert_positional_to_named(format_str: &str, field_count: usize) -> String {
    let mut result = format_str.to_string();
    for i in (0..field_count).rev() {
        result = result
            .replace(&format!("{{{}}}", i), &format!("{{f{}}}", i))
            .replace(&format!("{{{}:", i), &format!("{{f{}:", i));
    }
    result
}

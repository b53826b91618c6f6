//! Expansion of `#[derive(StrictDecode)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Expr, Field, Fields, Lit, Meta, Token, Type};

/// What this derive reads from one struct field.
#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    flatten: bool,
    skip: bool,
}

/// How a flattened sub-record is reached from its containing struct.
#[derive(Clone, Copy)]
enum FlattenAccess<'a> {
    Direct(&'a Type),
    Option(&'a Type),
    Box(&'a Type),
}

pub fn derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() || input.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "StrictDecode cannot be derived for generic types",
        ));
    }
    check_container_attrs(input)?;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "StrictDecode can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &data.fields,
            "StrictDecode can only be derived for structs with named fields",
        ));
    };

    let mut raw_fields = Vec::new();
    let mut apply_arms = Vec::new();

    for (index, field) in fields.named.iter().enumerate() {
        let attrs = field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        // Named fields always have an ident.
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let declared_name = ident.to_string();

        if attrs.flatten {
            let access = flatten_access(&field.ty);
            let inner = match access {
                FlattenAccess::Direct(inner)
                | FlattenAccess::Option(inner)
                | FlattenAccess::Box(inner) => inner,
            };

            raw_fields.push(quote! {
                ::strict_json::RawField {
                    name: #declared_name,
                    index: #index,
                    kind: ::strict_json::RawFieldKind::Flattened {
                        fields: <#inner as ::strict_json::StrictRecord>::raw_fields,
                    },
                }
            });

            let target = match access {
                FlattenAccess::Direct(_) => quote!(&mut self.#ident),
                // A flattened record behind an Option is materialized on
                // the first write into it.
                FlattenAccess::Option(inner) => quote! {
                    self.#ident.get_or_insert_with(<#inner as ::core::default::Default>::default)
                },
                FlattenAccess::Box(_) => quote!(&mut *self.#ident),
            };
            apply_arms.push(quote! {
                [#index, rest @ ..] => {
                    ::strict_json::StrictRecord::apply_field(#target, rest, raw, decoder)
                }
            });
            continue;
        }

        let external_name = attrs.rename.unwrap_or(declared_name);
        raw_fields.push(quote! {
            ::strict_json::RawField {
                name: #external_name,
                index: #index,
                kind: ::strict_json::RawFieldKind::Value,
            }
        });
        // In-place, so decoding into a dirty target updates fields
        // individually: null leaves the slot alone, nested records are
        // entered rather than replaced.
        apply_arms.push(quote! {
            [#index] => {
                ::strict_json::StrictDecode::decode_into(&mut self.#ident, raw, decoder)
            }
        });
    }

    // Keep the generated signature warning-free when every field was
    // skipped.
    let (raw_param, decoder_param) = if apply_arms.is_empty() {
        (format_ident!("_raw"), format_ident!("_decoder"))
    } else {
        (format_ident!("raw"), format_ident!("decoder"))
    };

    let ident = &input.ident;
    Ok(quote! {
        #[automatically_derived]
        impl ::strict_json::StrictRecord for #ident {
            fn raw_fields() -> &'static [::strict_json::RawField] {
                &[#(#raw_fields),*]
            }

            fn apply_field(
                &mut self,
                path: &[usize],
                #raw_param: &::strict_json::serde_json::Value,
                #decoder_param: &::strict_json::Decoder,
            ) -> ::core::result::Result<(), ::strict_json::Error> {
                match path {
                    #(#apply_arms)*
                    // A path that does not match the record's shape is
                    // skipped, not an error.
                    _ => ::core::result::Result::Ok(()),
                }
            }
        }

        #[automatically_derived]
        impl ::strict_json::StrictDecode for #ident {
            const HAS_STRICT_FIELDS: bool = true;

            fn decode_value(
                raw: &::strict_json::serde_json::Value,
                decoder: &::strict_json::Decoder,
            ) -> ::core::result::Result<Self, ::strict_json::Error> {
                let mut value = <Self as ::core::default::Default>::default();
                ::strict_json::decode::decode_record_into(&mut value, raw, decoder)?;
                ::core::result::Result::Ok(value)
            }

            fn decode_into(
                &mut self,
                raw: &::strict_json::serde_json::Value,
                decoder: &::strict_json::Decoder,
            ) -> ::core::result::Result<(), ::strict_json::Error> {
                ::strict_json::decode::decode_record_into(self, raw, decoder)
            }
        }
    })
}

/// Reject container-level serde attributes that would change key naming
/// behind this derive's back. Everything else (`deny_unknown_fields`,
/// `default`, ...) is serde's business and ignored here.
fn check_container_attrs(input: &DeriveInput) -> syn::Result<()> {
    for meta in serde_metas(&input.attrs)? {
        if meta.path().is_ident("rename_all") || meta.path().is_ident("rename_all_fields") {
            return Err(syn::Error::new_spanned(
                meta,
                "#[serde(rename_all)] is not supported by StrictDecode; \
                 rename fields individually with #[serde(rename = \"...\")]",
            ));
        }
    }
    Ok(())
}

fn field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for meta in serde_metas(&field.attrs)? {
        match &meta {
            Meta::Path(path) if path.is_ident("flatten") => out.flatten = true,
            Meta::Path(path) if path.is_ident("skip") || path.is_ident("skip_deserializing") => {
                out.skip = true;
            }
            Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                let Expr::Lit(expr) = &nv.value else {
                    return Err(syn::Error::new_spanned(nv, "expected a string literal"));
                };
                let Lit::Str(lit) = &expr.lit else {
                    return Err(syn::Error::new_spanned(nv, "expected a string literal"));
                };
                out.rename = Some(lit.value());
            }
            Meta::List(list) if list.path.is_ident("rename") => {
                return Err(syn::Error::new_spanned(
                    list,
                    "#[serde(rename(...))] is not supported by StrictDecode; \
                     use #[serde(rename = \"...\")]",
                ));
            }
            // Other serde attributes do not affect key naming; serde's
            // own derive handles them.
            _ => {}
        }
    }
    Ok(out)
}

/// Every `Meta` item across all `#[serde(...)]` attributes of an item.
fn serde_metas(attrs: &[syn::Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let parsed = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        metas.extend(parsed);
    }
    Ok(metas)
}

/// Classify how a `#[serde(flatten)]` field stores its sub-record:
/// directly, behind an `Option`, or behind a `Box`.
fn flatten_access(ty: &Type) -> FlattenAccess<'_> {
    if let Some(inner) = container_inner(ty, "Option") {
        return FlattenAccess::Option(inner);
    }
    if let Some(inner) = container_inner(ty, "Box") {
        return FlattenAccess::Box(inner);
    }
    FlattenAccess::Direct(ty)
}

/// The `T` of `wrapper<T>`, matched on the path's last segment.
fn container_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

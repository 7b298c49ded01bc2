mod decode_field;
mod decode_shape;

use decode_shape::{ShapeMetadata, decode_shape};
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Implements `Shape`: rows can be materialized into the struct.
///
/// ```rust,ignore
/// #[derive(Default, Shape)]
/// struct Totals {
///     customer: String,
///     amount: Option<Decimal>,
/// }
/// ```
#[proc_macro_derive(Shape, attributes(keel))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    match decode_shape(item) {
        Ok(shape) => shape_impl(&shape, false).into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Implements `Shape` and `Record`: the struct is persisted in a table.
///
/// ```rust,ignore
/// #[derive(Default, Record)]
/// #[keel(table = "orders", schema = "sales")]
/// struct Order {
///     #[keel(primary_key)]
///     id: i64,
///     customer: String,
///     #[keel(parent)]
///     audit: Audit,
/// }
/// ```
#[proc_macro_derive(Record, attributes(keel))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    let shape = match decode_shape(item) {
        Ok(shape) => shape,
        Err(e) => return e.to_compile_error().into(),
    };
    let ident = &shape.item.ident;
    let table = &shape.table;
    let schema = &shape.schema;
    let shape_impl = shape_impl(&shape, true);
    quote! {
        #shape_impl
        impl ::keel::Record for #ident {
            fn table_name() -> &'static str {
                #table
            }
            fn schema_name() -> &'static str {
                #schema
            }
        }
    }
    .into()
}

fn shape_impl(shape: &ShapeMetadata, record: bool) -> proc_macro2::TokenStream {
    let ident = &shape.item.ident;
    let name = &shape.name;
    let field_defs = shape.own_fields().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        let nullable = f.nullable;
        let primary_key = f.primary_key;
        quote! {
            ::keel::FieldDef {
                name: #name,
                value: <#ty as ::keel::AsValue>::as_empty_value(),
                nullable: #nullable,
                primary_key: #primary_key,
            }
        }
    });
    let decode = shape.fields.iter().map(|f| {
        let field = &f.ident;
        let ty = &f.ty;
        let column = &f.name;
        if f.parent {
            quote! {
                #field: <#ty as ::keel::Shape>::from_row(row)?
            }
        } else {
            quote! {
                #field: match row.get_column(#column) {
                    Some(v) => ::keel::Context::with_context(
                        <#ty as ::keel::AsValue>::try_from_value(v.clone()),
                        || format!("While decoding column `{}` of `{}`", #column, #name),
                    )?,
                    None => ::std::default::Default::default(),
                }
            }
        }
    });
    let read_fields = shape.own_fields().map(|f| {
        let field = &f.ident;
        let column = &f.name;
        quote! {
            #column => Some(::keel::AsValue::as_value(::std::clone::Clone::clone(&self.#field))),
        }
    });
    let (parent_fields, read_parent) = match shape.parent() {
        Some(parent) => {
            let field = &parent.ident;
            let ty = &parent.ty;
            (
                quote! {
                    fn parent_fields() -> &'static [::keel::FieldDef] {
                        <#ty as ::keel::Shape>::fields()
                    }
                },
                quote!(::keel::Shape::field_value(&self.#field, name)),
            )
        }
        None => (quote!(), quote!(None)),
    };
    quote! {
        impl ::keel::Shape for #ident {
            fn shape_name() -> &'static str {
                #name
            }
            fn fields() -> &'static [::keel::FieldDef] {
                static RESULT: ::std::sync::LazyLock<Box<[::keel::FieldDef]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#field_defs),*].into_boxed_slice());
                &RESULT
            }
            #parent_fields
            fn is_record() -> bool {
                #record
            }
            fn from_row(row: &::keel::RowLabeled) -> ::keel::Result<Self> {
                Ok(Self {
                    #(#decode),*
                })
            }
            fn field_value(&self, name: &str) -> Option<::keel::Value> {
                match name {
                    #(#read_fields)*
                    _ => #read_parent,
                }
            }
        }
    }
}

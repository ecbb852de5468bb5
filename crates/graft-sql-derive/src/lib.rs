//! Derive macro for declaring upsert table schemas.
//!
//! `#[derive(Table)]` turns a plain struct into a schema declaration by
//! implementing `graft_sql_core::schema::Schema` for it.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Lit, Meta,
    PathArguments, Type,
};

/// Derives `Schema` for a struct, producing its immutable table definition.
///
/// # Attributes
///
/// - `#[table(name = "table_name")]` - Overrides the SQL table name
///   (defaults to snake_case of the struct name)
/// - `#[table(unique(a, b))]` - Declares a composite unique constraint
///
/// # Field Attributes
///
/// - `#[column(primary_key)]` - Adds the field to the primary key; several
///   such fields form a composite key in declaration order
/// - `#[column(unique)]` - Declares a single-column unique constraint
/// - `#[column(name = "column_name")]` - Overrides the SQL column name
/// - `#[column(default = ...)]` - Sets a default literal (string, integer,
///   float, or boolean)
///
/// `Option<T>` fields map to nullable columns; everything else is NOT NULL.
/// Field types map onto SQL types: integers to `Integer`, floats to `Real`,
/// `bool` to `Boolean`, `String` to `Text`, `Vec<u8>` to `Blob`.
///
/// # Example
///
/// ```rust
/// use graft_sql_core::schema::Schema;
/// use graft_sql_derive::Table;
///
/// #[derive(Table)]
/// #[table(name = "users")]
/// struct User {
///     #[column(primary_key)]
///     id: i64,
///     name: String,
///     #[column(unique)]
///     email: Option<String>,
/// }
///
/// let table = User::table();
/// assert_eq!(table.name(), "users");
/// assert_eq!(table.primary_key(), Some(&["id".to_string()][..]));
/// ```
#[proc_macro_derive(Table, attributes(table, column))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_table_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_table_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_attrs = parse_table_attrs(&input.attrs)?;
    let table_name = table_attrs
        .name
        .unwrap_or_else(|| to_snake_case(&struct_name.to_string()));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Table derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Table derive only supports structs",
            ));
        }
    };
    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "Table derive requires at least one field",
        ));
    }

    let mut column_exprs: Vec<TokenStream2> = Vec::new();
    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let column_attrs = parse_column_attrs(&field.attrs)?;
        let column_name = column_attrs
            .name
            .unwrap_or_else(|| field_name.to_string());

        let (inner, nullable) = strip_option(&field.ty);
        let sql_type = sql_type_for(inner)?;

        let mut column = quote! {
            ::graft_sql_core::schema::Column::new(#column_name, #sql_type)
        };
        if column_attrs.primary_key {
            column = quote! { #column.primary_key() };
        }
        if column_attrs.unique {
            column = quote! { #column.unique() };
        }
        if !nullable && !column_attrs.primary_key {
            column = quote! { #column.not_null() };
        }
        if let Some(default) = column_attrs.default {
            column = quote! { #column.default_value(#default) };
        }
        column_exprs.push(column);
    }

    let unique_constraints: Vec<TokenStream2> = table_attrs
        .unique
        .iter()
        .map(|columns| quote! { .unique([#(#columns),*]) })
        .collect();

    let expanded = quote! {
        impl ::graft_sql_core::schema::Schema for #struct_name {
            const NAME: &'static str = #table_name;

            fn table() -> ::graft_sql_core::schema::Table {
                ::graft_sql_core::schema::Table::builder(#table_name)
                    #(.column(#column_exprs))*
                    #(#unique_constraints)*
                    .build()
            }
        }
    };

    Ok(expanded)
}

struct TableAttrs {
    name: Option<String>,
    unique: Vec<Vec<String>>,
}

struct ColumnAttrs {
    name: Option<String>,
    primary_key: bool,
    unique: bool,
    default: Option<TokenStream2>,
}

fn parse_table_attrs(attrs: &[Attribute]) -> syn::Result<TableAttrs> {
    let mut result = TableAttrs {
        name: None,
        unique: Vec::new(),
    };

    for attr in attrs {
        if attr.path().is_ident("table") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            result.name = Some(s.value());
                        }
                    }
                } else if meta.path.is_ident("unique") {
                    let mut columns = Vec::new();
                    meta.parse_nested_meta(|inner| {
                        columns.push(inner.path.require_ident()?.to_string());
                        Ok(())
                    })?;
                    if columns.is_empty() {
                        return Err(meta.error("unique constraint needs at least one column"));
                    }
                    result.unique.push(columns);
                } else {
                    return Err(meta.error("unknown table attribute"));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs {
        name: None,
        primary_key: false,
        unique: false,
        default: None,
    };

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    result.primary_key = true;
                } else if meta.path.is_ident("unique") {
                    result.unique = true;
                } else if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            result.name = Some(s.value());
                        }
                    }
                } else if meta.path.is_ident("default") {
                    let value: Expr = meta.value()?.parse()?;
                    result.default = Some(default_literal(&value)?);
                } else {
                    return Err(meta.error("unknown column attribute"));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn default_literal(value: &Expr) -> syn::Result<TokenStream2> {
    if let Expr::Lit(lit) = value {
        let tokens = match &lit.lit {
            Lit::Str(s) => {
                quote! { ::graft_sql_core::value::Value::Text(::std::string::String::from(#s)) }
            }
            Lit::Int(i) => {
                let n: i64 = i.base10_parse()?;
                quote! { ::graft_sql_core::value::Value::Int(#n) }
            }
            Lit::Float(f) => {
                let n: f64 = f.base10_parse()?;
                quote! { ::graft_sql_core::value::Value::Float(#n) }
            }
            Lit::Bool(b) => {
                let b = b.value;
                quote! { ::graft_sql_core::value::Value::Bool(#b) }
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "default must be a string, integer, float, or boolean literal",
                ));
            }
        };
        return Ok(tokens);
    }
    Err(syn::Error::new_spanned(
        value,
        "default must be a literal",
    ))
}

/// Peels `Option<T>` down to `T`, reporting whether the column is nullable.
fn strip_option(ty: &Type) -> (&Type, bool) {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (inner, true);
                    }
                }
            }
        }
    }
    (ty, false)
}

fn sql_type_for(ty: &Type) -> syn::Result<TokenStream2> {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            let ident = segment.ident.to_string();
            let mapped = match ident.as_str() {
                "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "isize"
                | "usize" => Some(quote! { ::graft_sql_core::schema::SqlType::Integer }),
                "f32" | "f64" => Some(quote! { ::graft_sql_core::schema::SqlType::Real }),
                "bool" => Some(quote! { ::graft_sql_core::schema::SqlType::Boolean }),
                "String" => Some(quote! { ::graft_sql_core::schema::SqlType::Text }),
                "Vec" if is_u8_vec(segment) => {
                    Some(quote! { ::graft_sql_core::schema::SqlType::Blob })
                }
                _ => None,
            };
            if let Some(tokens) = mapped {
                return Ok(tokens);
            }
        }
    }
    Err(syn::Error::new_spanned(
        ty,
        "unsupported column type; expected an integer, float, bool, String, or Vec<u8>",
    ))
}

fn is_u8_vec(segment: &syn::PathSegment) -> bool {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(Type::Path(inner))) = args.args.first() {
            return inner.path.is_ident("u8");
        }
    }
    false
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

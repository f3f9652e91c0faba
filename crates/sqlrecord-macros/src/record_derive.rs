//! Implementation of the Record derive macro.
//!
//! Parses `#[record(...)]` struct and field attributes and generates the
//! table binding, the capability traits and per-field setters.

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{
    Data, DeriveInput, Error, Field, Fields, GenericArgument, Ident, LitStr, PathArguments,
    Result, Type, Visibility,
};

/// Parsed definition of a struct with `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordDef {
    pub name: Ident,
    pub vis: Visibility,
    /// Table marker, read off the identifier field's `Id<Marker>`.
    pub table_type: Type,
    /// Present when the derive should emit the marker and its `Table` impl.
    pub binding: Option<TableBinding>,
    pub id: RecordFieldDef,
    pub meta: Ident,
    /// Column-backed fields in declaration order, identifier included.
    pub columns: Vec<RecordFieldDef>,
    /// Fields excluded from persistence.
    pub skipped: Vec<Ident>,
}

/// `#[record(table = "...", primary_key = Type)]`
#[derive(Debug)]
pub struct TableBinding {
    pub table: String,
    pub primary_key: Type,
}

/// One column-backed field.
#[derive(Debug, Clone)]
pub struct RecordFieldDef {
    pub name: Ident,
    pub ty: Type,
    pub column: String,
}

#[derive(Debug, Default)]
struct FieldAttrs {
    id: bool,
    meta: bool,
    skip: bool,
    column: Option<String>,
}

fn is_sql_identifier(name: &str) -> bool {
    // Literal pattern, cannot fail to compile
    regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").is_ok_and(|re| re.is_match(name))
}

fn parse_identifier_lit(lit: &LitStr, what: &str) -> Result<String> {
    let value = lit.value();
    if !is_sql_identifier(&value) {
        return Err(Error::new_spanned(
            lit,
            format!("invalid {what} `{value}`: expected letters, digits and underscores"),
        ));
    }
    Ok(value)
}

/// Parse a `DeriveInput` into a `RecordDef`.
pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Record requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            ));
        }
    };

    let binding = parse_struct_attrs(input)?;

    let mut id = None;
    let mut meta = None;
    let mut columns = Vec::new();
    let mut skipped = Vec::new();

    for field in fields {
        let name = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;
        let attrs = parse_field_attrs(field)?;

        let is_meta = attrs.meta || (name == "meta" && !attrs.id);
        if is_meta {
            if meta.replace(name.clone()).is_some() {
                return Err(Error::new_spanned(field, "duplicate meta field"));
            }
            continue;
        }
        if attrs.skip {
            skipped.push(name);
            continue;
        }

        let column = match attrs.column {
            Some(column) => column,
            None => name.to_string(),
        };
        let def = RecordFieldDef {
            name: name.clone(),
            ty: field.ty.clone(),
            column,
        };

        if attrs.id || name == "id" {
            let previous = id.replace(def.clone());
            if previous.is_some() {
                return Err(Error::new_spanned(field, "duplicate identifier field"));
            }
        }
        columns.push(def);
    }

    let id = id.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "Record requires an identifier field: name it `id` or mark it #[record(id)]",
        )
    })?;
    let meta = meta.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "Record requires a `MetaBag` field: name it `meta` or mark it #[record(meta)]",
        )
    })?;

    let table_type = id_table_type(&id.ty)
        .cloned()
        .ok_or_else(|| Error::new_spanned(&id.ty, "identifier field must have type `Id<Table>`"))?;

    Ok(RecordDef {
        name: input.ident.clone(),
        vis: input.vis.clone(),
        table_type,
        binding,
        id,
        meta,
        columns,
        skipped,
    })
}

fn parse_struct_attrs(input: &DeriveInput) -> Result<Option<TableBinding>> {
    let mut table = None;
    let mut primary_key = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some(parse_identifier_lit(&lit, "table name")?);
            } else if meta.path.is_ident("primary_key") {
                let ty: Type = meta.value()?.parse()?;
                primary_key = Some(ty);
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                return Err(meta.error(format!(
                    "unknown record attribute `{attr_name}`. \
                     Valid struct attributes are: table, primary_key"
                )));
            }
            Ok(())
        })?;
    }

    match (table, primary_key) {
        (Some(table), Some(primary_key)) => Ok(Some(TableBinding { table, primary_key })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(Error::new_spanned(
            &input.ident,
            "`table` requires `primary_key = Type`",
        )),
        (None, Some(primary_key)) => Err(Error::new_spanned(
            primary_key,
            "`primary_key` requires `table = \"...\"`",
        )),
    }
}

fn parse_field_attrs(field: &Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                attrs.id = true;
            } else if meta.path.is_ident("meta") {
                attrs.meta = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.column = Some(parse_identifier_lit(&lit, "column name")?);
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                return Err(meta.error(format!(
                    "unknown record attribute `{attr_name}`. \
                     Valid field attributes are: id, meta, skip, column"
                )));
            }
            Ok(())
        })?;
    }

    if attrs.id && (attrs.meta || attrs.skip) {
        return Err(Error::new_spanned(
            field,
            "the identifier field cannot be `meta` or `skip`",
        ));
    }
    if attrs.meta && attrs.column.is_some() {
        return Err(Error::new_spanned(field, "the meta field has no column"));
    }

    Ok(attrs)
}

/// Extract `X` from `Id<X>` (or any path ending in `Id<X>`).
fn id_table_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Id" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Generate every impl for a parsed record.
pub fn generate_record_impl(def: &RecordDef) -> TokenStream {
    let name = &def.name;
    let table_type = &def.table_type;
    let meta = &def.meta;
    let id_field = &def.id.name;
    let pk_column = &def.id.column;

    let table_binding = def.binding.as_ref().map(|binding| {
        let vis = &def.vis;
        let table = &binding.table;
        let primary_key = &binding.primary_key;
        let doc = format!("Table marker for `{table}`.");
        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #vis struct #table_type;

            impl sqlrecord_core::Table for #table_type {
                const NAME: &'static str = #table;
                type PrimaryKey = #primary_key;
                type Record = #name;
            }
        }
    });

    let field_infos = def.columns.iter().map(|field| {
        let field_name = field.name.to_string();
        let column = &field.column;
        let is_pk = field.name == def.id.name;
        quote! {
            sqlrecord_core::FieldInfo::new(#field_name, #column).primary_key(#is_pk)
        }
    });

    let to_values = def.columns.iter().map(|field| {
        let field_name = &field.name;
        quote! {
            sqlrecord_core::Value::from(::core::clone::Clone::clone(&self.#field_name))
        }
    });

    let from_row_columns = def.columns.iter().map(|field| {
        let field_name = &field.name;
        let ty = &field.ty;
        let column = &field.column;
        quote! {
            #field_name: row.get_named::<#ty>(#column)?
        }
    });
    let from_row_skipped = def.skipped.iter().map(|field_name| {
        quote! {
            #field_name: ::core::default::Default::default()
        }
    });

    let setters = def.columns.iter().map(|field| {
        let field_name = &field.name;
        let field_name_str = field_name.to_string();
        let ty = &field.ty;
        let setter = format_ident!("set_{}", field_name);
        let doc = format!("Assign `{field_name_str}` and mark it touched.");
        quote! {
            #[doc = #doc]
            pub fn #setter(&mut self, value: impl ::core::convert::Into<#ty>) -> &mut Self {
                self.#field_name = value.into();
                self.#meta.touch(#field_name_str);
                self
            }
        }
    });

    quote! {
        #table_binding

        impl sqlrecord_core::HasIdentifier for #name {
            type Table = #table_type;

            fn id(&self) -> &sqlrecord_core::Id<#table_type> {
                &self.#id_field
            }
        }

        impl sqlrecord_core::HasMeta for #name {
            fn meta(&self) -> &sqlrecord_core::MetaBag {
                &self.#meta
            }

            fn meta_mut(&mut self) -> &mut sqlrecord_core::MetaBag {
                &mut self.#meta
            }
        }

        impl sqlrecord_core::Record for #name {
            const PRIMARY_KEY: &'static str = #pk_column;

            fn fields() -> &'static [sqlrecord_core::FieldInfo] {
                static FIELDS: &[sqlrecord_core::FieldInfo] = &[
                    #(#field_infos),*
                ];
                FIELDS
            }

            fn to_values(&self) -> ::std::vec::Vec<sqlrecord_core::Value> {
                ::std::vec![
                    #(#to_values),*
                ]
            }

            fn from_row(row: &sqlrecord_core::Row) -> sqlrecord_core::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#from_row_columns,)*
                    #(#from_row_skipped,)*
                    #meta: sqlrecord_core::MetaBag::new(),
                })
            }
        }

        impl #name {
            #(#setters)*
        }
    }
}

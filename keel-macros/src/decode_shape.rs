use crate::decode_field::{FieldMetadata, decode_field};
use convert_case::{Case, Casing};
use syn::{Error, Fields, ItemStruct, LitStr, Result, parse::ParseBuffer, spanned::Spanned};

pub(crate) struct ShapeMetadata {
    pub(crate) item: ItemStruct,
    /// Name used in portable statements.
    pub(crate) name: String,
    pub(crate) table: String,
    pub(crate) schema: String,
    pub(crate) fields: Vec<FieldMetadata>,
}

impl ShapeMetadata {
    pub(crate) fn parent(&self) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.parent)
    }
    pub(crate) fn own_fields(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|f| !f.parent)
    }
}

pub(crate) fn decode_shape(item: ItemStruct) -> Result<ShapeMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Keel shapes cannot be generic",
        ));
    }
    let Fields::Named(named) = &item.fields else {
        return Err(Error::new(
            item.fields.span(),
            "Keel shapes must be structs with named fields",
        ));
    };
    let fields = named
        .named
        .iter()
        .map(decode_field)
        .collect::<Result<Vec<_>>>()?;
    if let Some(second) = fields.iter().filter(|f| f.parent).nth(1) {
        return Err(Error::new(
            second.ident.span(),
            "Only one field can be marked with `#[keel(parent)]`",
        ));
    }
    let mut name = item.ident.to_string();
    let mut table = name.to_case(Case::Snake);
    if table.starts_with('_') {
        table.remove(0);
    }
    let mut schema = String::new();
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("keel") {
            continue;
        }
        let list = meta.require_list()?;
        list.parse_nested_meta(|arg| {
            let value = arg.value().and_then(ParseBuffer::parse::<LitStr>);
            if arg.path.is_ident("table") {
                table = value
                    .map_err(|e| arg.error(format!("{e}, use it like: `#[keel(table = \"orders\")]`")))?
                    .value();
            } else if arg.path.is_ident("schema") {
                schema = value
                    .map_err(|e| arg.error(format!("{e}, use it like: `#[keel(schema = \"sales\")]`")))?
                    .value();
            } else if arg.path.is_ident("name") {
                name = value
                    .map_err(|e| arg.error(format!("{e}, use it like: `#[keel(name = \"Order\")]`")))?
                    .value();
            } else {
                return Err(arg.error("Unknown attribute inside keel macro"));
            }
            Ok(())
        })?;
    }
    Ok(ShapeMetadata {
        item,
        name,
        table,
        schema,
        fields,
    })
}

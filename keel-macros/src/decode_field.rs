use syn::{Error, Field, GenericArgument, Ident, LitStr, PathArguments, Result, Type, parse::ParseBuffer, spanned::Spanned};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Column name.
    pub(crate) name: String,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    /// Aggregated parent shape, its fields are flattened into the row.
    pub(crate) parent: bool,
}

/// `Some(T)` when `ty` is `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

pub(crate) fn decode_field(field: &Field) -> Result<FieldMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new(field.span(), "Field is expected to have a name"));
    };
    let mut name = ident.to_string();
    if let Some(raw) = name.strip_prefix("r#") {
        name = raw.to_string();
    }
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        nullable: option_inner(&field.ty).is_some(),
        primary_key: false,
        parent: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("keel") {
            continue;
        }
        let list = meta.require_list()?;
        list.parse_nested_meta(|arg| {
            if arg.path.is_ident("primary_key") {
                if arg.input.peek(syn::Token![=]) {
                    return Err(arg.error("use it like: `#[keel(primary_key)]`"));
                }
                metadata.primary_key = true;
            } else if arg.path.is_ident("parent") {
                if arg.input.peek(syn::Token![=]) {
                    return Err(arg.error("use it like: `#[keel(parent)]`"));
                }
                metadata.parent = true;
            } else if arg.path.is_ident("name") {
                metadata.name = arg
                    .value()
                    .and_then(ParseBuffer::parse::<LitStr>)
                    .map_err(|e| arg.error(format!("{e}, use it like: `#[keel(name = \"column\")]`")))?
                    .value();
            } else {
                return Err(arg.error("Unknown attribute inside keel macro"));
            }
            Ok(())
        })?;
    }
    if metadata.primary_key && metadata.parent {
        return Err(Error::new(
            metadata.ident.span(),
            "A parent field cannot be the primary key",
        ));
    }
    Ok(metadata)
}

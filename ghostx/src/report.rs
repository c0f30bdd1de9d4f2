use crate::{
    classify::{FieldClass, FieldKey, GhostLayout},
    field::FieldVisibility,
};

/// A plain-data description of a [`GhostLayout`]. Field order is the layout order, so two reports of the same type
/// are always identical.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LayoutReport {
    pub owner:  String,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldReport {
    pub key:        FieldKey,
    pub name:       String,
    pub declaring:  String,
    pub class:      FieldClass,
    pub visibility: FieldVisibility,
    pub type_name:  String,
    pub default:    Option<String>,
}

impl GhostLayout {
    pub fn report(&self) -> LayoutReport {
        LayoutReport {
            owner:  self.owner().name().to_string(),
            fields: self
                .fields()
                .iter()
                .map(|field| {
                    let descriptor = field.descriptor();
                    FieldReport {
                        key:        field.key().clone(),
                        name:       descriptor.name().to_string(),
                        declaring:  descriptor.declaring().name().to_string(),
                        class:      field.class(),
                        visibility: descriptor.visibility(),
                        type_name:  descriptor.type_name().to_string(),
                        default:    descriptor.default().literal().map(str::to_string),
                    }
                })
                .collect(),
        }
    }
}

//! Non-graphical objects stored in the OBJECTS section.

use crate::cad_object::ObjectCommon;

mod dictionary;
mod dictionary_variable;
mod group;
mod layout;
mod plot_settings;
mod scale;
mod sort_entities_table;
mod xrecord;

pub use dictionary::{CadDictionary, DictionaryCloningFlags};
pub use dictionary_variable::DictionaryVariable;
pub use group::Group;
pub use layout::Layout;
pub use plot_settings::{PageSetup, PaperMargin, PlotFlags, PlotSettings};
pub use scale::Scale;
pub use sort_entities_table::{SortEntitiesTable, Sorter};
pub use xrecord::{XRecord, XRecordEntry, XRecordValue};

/// Object of a recognized type whose fields are not modelled.
///
/// Only identity, ownership and extended data are kept, so references to it
/// resolve, but writers skip it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpaqueObject {
    pub common: ObjectCommon,
}

impl OpaqueObject {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Object whose type name is not recognized at all.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownObject {
    pub common: ObjectCommon,
    /// Type name as read from group code 0
    pub object_name: String,
}

impl UnknownObject {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            common: ObjectCommon::new(),
            object_name: object_name.into(),
        }
    }
}

/// Pattern matching every recognized-but-unmodelled variant.
macro_rules! opaque {
    ($binding:ident) => {
        (ObjectType::Material($binding)
            | ObjectType::VisualStyle($binding)
            | ObjectType::PlaceHolder($binding)
            | ObjectType::MLineStyle($binding)
            | ObjectType::ImageDefinition($binding)
            | ObjectType::BookColor($binding)
            | ObjectType::MultiLeaderStyle($binding))
    };
}

/// Enumeration of all non-graphical object types
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectType {
    Dictionary(CadDictionary),
    Layout(Layout),
    /// Opaque application data
    XRecord(XRecord),
    Group(Group),
    Scale(Scale),
    DictionaryVariable(DictionaryVariable),
    /// Named page setup (PLOTSETTINGS)
    PageSetup(PageSetup),
    SortEntitiesTable(SortEntitiesTable),
    // Recognized but not modelled
    Material(OpaqueObject),
    VisualStyle(OpaqueObject),
    PlaceHolder(OpaqueObject),
    MLineStyle(OpaqueObject),
    ImageDefinition(OpaqueObject),
    BookColor(OpaqueObject),
    MultiLeaderStyle(OpaqueObject),
    /// Unrecognized type, kept only on request
    Unknown(UnknownObject),
}

impl ObjectType {
    pub fn common(&self) -> &ObjectCommon {
        match self {
            ObjectType::Dictionary(o) => &o.common,
            ObjectType::Layout(o) => &o.common,
            ObjectType::XRecord(o) => &o.common,
            ObjectType::Group(o) => &o.common,
            ObjectType::Scale(o) => &o.common,
            ObjectType::DictionaryVariable(o) => &o.common,
            ObjectType::PageSetup(o) => &o.common,
            ObjectType::SortEntitiesTable(o) => &o.common,
            ObjectType::Unknown(o) => &o.common,
            opaque!(o) => &o.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ObjectCommon {
        match self {
            ObjectType::Dictionary(o) => &mut o.common,
            ObjectType::Layout(o) => &mut o.common,
            ObjectType::XRecord(o) => &mut o.common,
            ObjectType::Group(o) => &mut o.common,
            ObjectType::Scale(o) => &mut o.common,
            ObjectType::DictionaryVariable(o) => &mut o.common,
            ObjectType::PageSetup(o) => &mut o.common,
            ObjectType::SortEntitiesTable(o) => &mut o.common,
            ObjectType::Unknown(o) => &mut o.common,
            opaque!(o) => &mut o.common,
        }
    }

    /// DXF type name
    pub fn object_name(&self) -> &str {
        match self {
            ObjectType::Dictionary(d) if d.with_default => "ACDBDICTIONARYWDFLT",
            ObjectType::Dictionary(_) => "DICTIONARY",
            ObjectType::Layout(_) => "LAYOUT",
            ObjectType::XRecord(_) => "XRECORD",
            ObjectType::Group(_) => "GROUP",
            ObjectType::Scale(_) => "SCALE",
            ObjectType::DictionaryVariable(_) => "DICTIONARYVAR",
            ObjectType::PageSetup(_) => "PLOTSETTINGS",
            ObjectType::SortEntitiesTable(_) => "SORTENTSTABLE",
            ObjectType::Material(_) => "MATERIAL",
            ObjectType::VisualStyle(_) => "VISUALSTYLE",
            ObjectType::PlaceHolder(_) => "ACDBPLACEHOLDER",
            ObjectType::MLineStyle(_) => "MLINESTYLE",
            ObjectType::ImageDefinition(_) => "IMAGEDEF",
            ObjectType::BookColor(_) => "DBCOLOR",
            ObjectType::MultiLeaderStyle(_) => "MLEADERSTYLE",
            ObjectType::Unknown(o) => &o.object_name,
        }
    }

    /// Build the shell of a recognized-but-unmodelled type from its DXF name.
    pub fn opaque_from_name(name: &str) -> Option<Self> {
        match name {
            "MATERIAL" => Some(ObjectType::Material(OpaqueObject::new())),
            "VISUALSTYLE" => Some(ObjectType::VisualStyle(OpaqueObject::new())),
            "ACDBPLACEHOLDER" => Some(ObjectType::PlaceHolder(OpaqueObject::new())),
            "MLINESTYLE" => Some(ObjectType::MLineStyle(OpaqueObject::new())),
            "IMAGEDEF" => Some(ObjectType::ImageDefinition(OpaqueObject::new())),
            "DBCOLOR" => Some(ObjectType::BookColor(OpaqueObject::new())),
            "MLEADERSTYLE" => Some(ObjectType::MultiLeaderStyle(OpaqueObject::new())),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueObject> {
        match self {
            opaque!(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_opaque_mut(&mut self) -> Option<&mut OpaqueObject> {
        match self {
            opaque!(o) => Some(o),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_names() {
        assert_eq!(ObjectType::Dictionary(CadDictionary::new()).object_name(), "DICTIONARY");
        assert_eq!(ObjectType::XRecord(XRecord::new()).object_name(), "XRECORD");
        assert_eq!(
            ObjectType::Unknown(UnknownObject::new("ACDBDETAILVIEWSTYLE")).object_name(),
            "ACDBDETAILVIEWSTYLE"
        );
    }

    #[test]
    fn test_opaque_from_name() {
        let material = ObjectType::opaque_from_name("MATERIAL");
        assert!(matches!(material, Some(ObjectType::Material(_))));
        assert!(ObjectType::opaque_from_name("LAYOUT").is_none());
        assert!(material.as_ref().and_then(|o| o.as_opaque()).is_some());

        for name in ["MLINESTYLE", "IMAGEDEF", "DBCOLOR", "MLEADERSTYLE"] {
            let object = ObjectType::opaque_from_name(name).unwrap();
            assert_eq!(object.object_name(), name);
            assert!(object.as_opaque().is_some());
        }
    }

    #[test]
    fn test_dictionary_with_default_name() {
        let dictionary = CadDictionary::with_default(None);
        assert_eq!(
            ObjectType::Dictionary(dictionary).object_name(),
            "ACDBDICTIONARYWDFLT"
        );
        assert_eq!(ObjectType::PageSetup(PageSetup::new("A3")).object_name(), "PLOTSETTINGS");
    }
}

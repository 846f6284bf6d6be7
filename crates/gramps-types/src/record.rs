use crate::category::Category;
use crate::entity::{
    Citation, Entity, Event, Family, Media, Note, Person, Place, Repository, Source, Tag,
};
use crate::handle::Handle;
use crate::value::Value;

macro_rules! record {
    ($($name:ident),* $(,)?) => {
        /// A live record of any category, as held by a record store.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Record {
            $($name($name),)*
        }

        impl Record {
            pub fn category(&self) -> Category {
                match self {
                    $(Record::$name(_) => Category::$name,)*
                }
            }

            pub fn handle(&self) -> &Handle {
                match self {
                    $(Record::$name(e) => e.handle(),)*
                }
            }

            pub fn to_struct(&self) -> Value {
                match self {
                    $(Record::$name(e) => e.to_struct(),)*
                }
            }

            pub fn serialize(&self) -> Vec<u8> {
                match self {
                    $(Record::$name(e) => e.serialize(),)*
                }
            }

            pub fn gramps_id(&self) -> Option<&str> {
                match self {
                    $(Record::$name(e) => e.gramps_id(),)*
                }
            }
        }

        $(
            impl From<$name> for Record {
                fn from(entity: $name) -> Self {
                    Record::$name(entity)
                }
            }
        )*
    };
}

record!(Person, Family, Source, Citation, Event, Media, Place, Repository, Note, Tag);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_and_handle_follow_the_entity() {
        let record = Record::from(Family::new(Handle::new("F1").unwrap()).with_gramps_id("F0001"));
        assert_eq!(record.category(), Category::Family);
        assert_eq!(record.handle().as_str(), "F1");
        assert_eq!(record.gramps_id(), Some("F0001"));
        assert_eq!(record.to_struct().class_name(), Some("Family"));
    }

    #[test]
    fn serialize_matches_entity() {
        let note = Note::new(Handle::new("N1").unwrap()).with_field("text", "x");
        let record = Record::from(note.clone());
        assert_eq!(record.serialize(), note.serialize());
    }
}

use super::{ASObject, ActivityObject, activity_model};
use crate::builder::{Builder, Model};
use geostreams_types::{Object, Value};

/// An ordered collection of Activity Streams objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection(Object);

activity_model!(Collection, |type_name| type_name == "collection");

impl Collection {
    pub fn builder() -> Builder<Self> {
        Builder::typed("collection")
    }

    pub fn to_builder(&self) -> Builder<Self> {
        Builder::new().from_existing(self)
    }

    /// Member objects in insertion order; empty when unset.
    pub fn items(&self) -> Vec<ASObject> {
        let Some(items) = self.0.get("items").and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let object = item
                    .as_object()
                    .and_then(|object| ASObject::try_from_object(object.clone()).ok());
                if object.is_none() {
                    log::warn!("Skipping {} entry in collection items", item.kind());
                }
                object
            })
            .collect()
    }

    /// The declared `totalItems`, which may exceed the items present.
    pub fn total_items(&self) -> Option<i64> {
        self.0.get_as("totalItems")
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Builder<Collection> {
    /// Append one object to `items`.
    pub fn add<T: ActivityObject>(mut self, item: T) -> Self {
        self.push("items", item.into_object());
        self
    }

    pub fn add_all<T: ActivityObject>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        for item in items {
            self.push("items", item.into_object());
        }
        self
    }

    pub fn total_items(self, total: i64) -> Self {
        self.set("totalItems", total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> ASObject {
        ASObject::builder("person").display_name(name).build().unwrap()
    }

    #[test]
    fn test_items_keep_order() {
        let collection = Collection::builder()
            .add(person("Ann"))
            .add_all([person("Bo"), person("Cy")])
            .total_items(10)
            .build()
            .unwrap();

        let names: Vec<String> = collection
            .items()
            .iter()
            .filter_map(ASObject::display_name)
            .collect();
        assert_eq!(names, vec!["Ann", "Bo", "Cy"]);
        assert_eq!(collection.total_items(), Some(10));
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_empty_collection() {
        let collection = Collection::builder().build().unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.total_items(), None);
        assert_eq!(collection.type_name(), "collection");
    }

    #[test]
    fn test_nested_collections_are_items() {
        let inner = Collection::builder().add(person("Di")).build().unwrap();
        let outer = Collection::builder().add(inner.clone()).build().unwrap();

        let items = outer.items();
        assert_eq!(items.len(), 1);
        let back: Collection = items[0].clone().downcast().unwrap();
        assert_eq!(back, inner);
    }
}

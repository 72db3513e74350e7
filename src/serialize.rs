//! `serde` support. A collection is represented as a struct with a single `items`
//! sequence, e.g. `{"items":[1,2,3]}` in JSON.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::collection::Collection;

impl<T: Serialize, const N: usize> Serialize for Collection<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Collection", 1)?;
        state.serialize_field("items", self.as_slice())?;
        state.end()
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for Collection<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(rename = "Collection")]
        struct Repr<U> {
            items: Vec<U>,
        }

        Repr::deserialize(deserializer).map(|repr| Collection::from(repr.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::collect;

    #[test]
    fn test_serialize_as_items_struct() {
        let collection = collect(["first", "last"]);
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"{"items":["first","last"]}"#);
    }

    #[test]
    fn test_deserialize_from_items_struct() {
        let collection: Collection<u32, 2> =
            serde_json::from_str(r#"{"items":[1,2,3]}"#).unwrap();
        assert_eq!(collection, [1, 2, 3]);
        assert!(!collection.is_inline());

        let empty: Collection<u32> = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_deserialize_requires_items_field() {
        let result: Result<Collection<u32>, _> = serde_json::from_str("{}");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("missing field `items`"));
    }

    #[test]
    fn test_serde_round_trip_of_records() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct TestObject {
            id: i32,
            name: String,
        }

        let original = collect([
            TestObject {
                id: 1,
                name: "John".into(),
            },
            TestObject {
                id: 2,
                name: "Jane".into(),
            },
        ]);
        let json = serde_json::to_string(&original).unwrap();
        let restored: Collection<TestObject> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }
}

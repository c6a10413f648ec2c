use std::collections::BTreeMap;

use toolbox::internal::lookup::{get_key, get_keys, LookupError};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<(&'static str, &'static str)> {
        vec![
            ("key1", "value1"),
            ("key4", "value4"),
            ("key2", "value5"),
            ("key3", "value5"),
            ("key5", "value5"),
        ]
    }

    #[test]
    fn test_get_keys_in_iteration_order() {
        let pairs = sample();
        let iter = pairs.iter().map(|(k, v)| (k, v));

        assert_eq!(get_keys(&"value5", iter).unwrap(), vec![&"key2", &"key3", &"key5"]);
    }

    #[test]
    fn test_get_keys_single_match() {
        let map: BTreeMap<_, _> = sample().into_iter().collect();

        assert_eq!(get_keys(&"value4", &map).unwrap(), vec![&"key4"]);
    }

    #[test]
    fn test_get_keys_missing_value() {
        let map: BTreeMap<_, _> = sample().into_iter().collect();

        assert_eq!(
            get_keys(&"value6", &map),
            Err(LookupError::ValueNotFound("\"value6\"".to_string()))
        );
    }

    #[test]
    fn test_get_key_first_or_none() {
        let map: BTreeMap<_, _> = sample().into_iter().collect();

        assert_eq!(get_key(&"value5", &map), Some(&"key2"));
        assert_eq!(get_key(&"value1", &map), Some(&"key1"));
        assert_eq!(get_key(&"value6", &map), None);
    }
}

//! UUIDs stored as int arrays of length 4, most significant int first.

use std::borrow::Borrow;
use std::hash::Hash;

use ::uuid::Uuid;

use crate::tag::Tag;
use crate::{Compound, Error, IntArray, Result, Value};

/// Encodes `uuid` as an int array.
pub fn uuid_to_value(uuid: Uuid) -> Value {
    let (most, least) = uuid.as_u64_pair();

    let first = (most >> 32) as i32;
    let second = most as i32;
    let third = (least >> 32) as i32;
    let fourth = least as i32;

    Value::IntArray(IntArray::from([first, second, third, fourth]))
}

/// Decodes a UUID from an int array of exactly four elements.
pub fn uuid_from_value(value: &Value) -> Result<Uuid> {
    let Value::IntArray(array) = value else {
        return Err(Error::mismatch(Tag::IntArray, value.tag()));
    };

    match **array {
        [first, second, third, fourth] => {
            let most = (u64::from(first as u32) << 32) | u64::from(second as u32);
            let least = (u64::from(third as u32) << 32) | u64::from(fourth as u32);

            Ok(Uuid::from_u64_pair(most, least))
        }
        _ => Err(Error::InvalidUuidLength(array.len())),
    }
}

impl From<Uuid> for Value {
    fn from(uuid: Uuid) -> Self {
        uuid_to_value(uuid)
    }
}

impl Compound {
    /// Reads the UUID under `k`, returning `None` if there is no valid UUID
    /// there.
    pub fn get_uuid<Q>(&self, k: &Q) -> Option<Uuid>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get(k).and_then(|v| uuid_from_value(v).ok())
    }

    /// Whether there is a valid UUID under `k`.
    pub fn contains_uuid<Q>(&self, k: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get_uuid(k).is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{compound, ErrorKind};

    #[test]
    fn layout() {
        let uuid = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
        let value = Value::from(uuid);

        assert_eq!(
            value.as_int_array().unwrap().as_slice(),
            &[
                0x0011_2233,
                0x4455_6677,
                0x8899_aabb_u32 as i32,
                0xccdd_eeff_u32 as i32
            ]
        );
        assert_eq!(uuid_from_value(&value).unwrap(), uuid);
    }

    #[test]
    fn round_trip() {
        for uuid in [Uuid::nil(), Uuid::from_u128(u128::MAX), Uuid::from_u128(0xdead_beef << 64)] {
            assert_eq!(uuid_from_value(&uuid_to_value(uuid)).unwrap(), uuid);
        }
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = uuid_from_value(&Value::from(vec![1_i32, 2, 3])).unwrap_err();

        assert!(matches!(err, Error::InvalidUuidLength(3)));
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = uuid_from_value(&Value::from(vec![1_i64, 2, 3, 4])).unwrap_err();

        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: Tag::IntArray,
                found: Tag::LongArray
            }
        ));
    }

    #[test]
    fn compound_lookup() {
        let uuid = Uuid::from_u128(42);
        let c = compound! { "id" => uuid, "bad" => vec![1_i32, 2] };

        assert_eq!(c.get_uuid("id"), Some(uuid));
        assert!(c.contains_uuid("id"));
        assert_eq!(c.get_uuid("bad"), None);
        assert_eq!(c.get_uuid("missing"), None);
    }
}

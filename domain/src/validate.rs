//! Checks for untyped input (JSON values) before it reaches the store.
//!
//! Typed callers never need these: a `User` or a `UserId` is valid by
//! construction. Anything that arrives as a `serde_json::Value` must be shown
//! to be a record (for add) or an integer (for remove) first.

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::{CoreError, User, UserId};

/// Parse a user record; `null`, scalars and arrays are rejected.
pub fn parse_user(value: &Value) -> Result<User, CoreError> {
    match value {
        Value::Null => Err(CoreError::InvalidInput(
            "cannot add user, input user is missing".into(),
        )),
        Value::Object(fields) => {
            let mut fields = fields.clone();
            let id = match fields.get("id") {
                Some(Value::Number(n)) => integral_id(n),
                _ => None,
            };
            if let Some(id) = id {
                fields.insert("id".into(), Value::from(id));
            }
            User::deserialize(Value::Object(fields))
                .map_err(|e| CoreError::InvalidInput(format!("cannot add user, {}", e)))
        }
        _ => Err(CoreError::InvalidInput(
            "cannot add user, input user is not a record".into(),
        )),
    }
}

/// Integral value of `n` when it fits a `UserId`; `5.0` counts as `5`.
fn integral_id(n: &Number) -> Option<UserId> {
    if let Some(id) = n.as_i64() {
        return Some(id);
    }
    let f = n.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a user id; only integral numbers that fit a `UserId` pass.
pub fn parse_user_id(value: &Value) -> Result<UserId, CoreError> {
    match value {
        Value::Null => Err(CoreError::InvalidInput(
            "cannot remove user, input id is missing".into(),
        )),
        Value::Number(n) => integral_id(n).ok_or_else(|| {
            CoreError::InvalidInput(format!("cannot remove user, id {} is not an integer", n))
        }),
        _ => Err(CoreError::InvalidInput(
            "cannot remove user, input id is not a number".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_record_is_accepted() {
        let user = parse_user(&json!({"id": 0, "name": "Harry"})).unwrap();
        assert_eq!(user, User::new(0, "Harry"));
    }

    #[test]
    fn missing_or_scalar_user_is_rejected() {
        for value in [json!(null), json!(42), json!("Harry"), json!(true), json!([1, 2])] {
            let err = parse_user(&value).unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)), "{value} accepted");
        }
    }

    #[test]
    fn record_without_fields_is_rejected() {
        let err = parse_user(&json!({"name": "Harry"})).unwrap_err();
        match err {
            CoreError::InvalidInput(msg) => assert!(msg.contains("id"), "{msg}"),
            _ => panic!("expected InvalidInput"),
        }
        assert!(parse_user(&json!({"id": "0", "name": "Harry"})).is_err());
    }

    #[test]
    fn integral_id_is_accepted() {
        assert_eq!(parse_user_id(&json!(5)).unwrap(), 5);
        assert_eq!(parse_user_id(&json!(-3)).unwrap(), -3);
    }

    #[test]
    fn integral_float_id_is_accepted() {
        assert_eq!(parse_user_id(&json!(5.0)).unwrap(), 5);
        assert_eq!(parse_user_id(&json!(-2.0)).unwrap(), -2);
    }

    #[test]
    fn integral_float_id_in_record_is_accepted() {
        let user = parse_user(&json!({"id": 2.0, "name": "John"})).unwrap();
        assert_eq!(user, User::new(2, "John"));
        assert!(matches!(
            parse_user(&json!({"id": 2.5, "name": "John"})),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(matches!(
            parse_user_id(&json!(null)),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_user_id(&json!("x")),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_user_id(&json!(1.5)),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_user_id(&json!(u64::MAX)),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_user_id(&json!(1e19)),
            Err(CoreError::InvalidInput(_))
        ));
    }
}

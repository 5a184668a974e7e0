//! Cursor and offset pagination over in-memory, already ordered result sets.

mod connection;
mod cursor;
mod offset;

pub use connection::*;
pub use cursor::*;
pub use offset::*;

use crate::{query::FieldSelection, PreprocessError, PreprocessResult};
use async_graphql_value::ConstValue;
use gql_preprocess_lib::constants;

/// Integer argument saturated to the `i32` range.
fn int_argument(field: &FieldSelection, name: &str) -> Option<i32> {
    match field.argument(name)? {
        ConstValue::Number(n) => match n.as_i64() {
            Some(n) => i32::try_from(n.clamp(i32::MIN.into(), i32::MAX.into())).ok(),
            None => n.as_u64().map(|_| i32::MAX),
        },
        _ => None,
    }
}

fn string_argument(field: &FieldSelection, name: &str) -> Option<String> {
    match field.argument(name)? {
        ConstValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// `first`/`after`/`last`/`before` window of a cursor-paginated field.
/// See: https://relay.dev/graphql/connections.htm#sec-Arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorPagingArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub last: Option<i32>,
    pub before: Option<String>,
}

impl CursorPagingArgs {
    /// Read the window from a field's arguments. Missing or mistyped arguments are
    /// treated as absent.
    pub fn from_selection(field: &FieldSelection) -> Self {
        Self {
            first: int_argument(field, constants::FIRST),
            after: string_argument(field, constants::AFTER),
            last: int_argument(field, constants::LAST),
            before: string_argument(field, constants::BEFORE),
        }
    }

    pub fn is_forward(&self) -> bool {
        self.first.is_some() || self.after.is_some()
    }

    pub fn is_backward(&self) -> bool {
        self.last.is_some() || self.before.is_some()
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.is_forward() || self.is_backward()
    }

    pub fn validate(&self) -> PreprocessResult<()> {
        if let Some(first) = self.first.filter(|n| *n < 0) {
            return Err(PreprocessError::InvalidWindow(format!(
                "`{}` must be non-negative, got {first}",
                constants::FIRST
            )));
        }

        if let Some(last) = self.last.filter(|n| *n < 0) {
            return Err(PreprocessError::InvalidWindow(format!(
                "`{}` must be non-negative, got {last}",
                constants::LAST
            )));
        }

        Ok(())
    }
}

/// `skip`/`take` window of an offset-paginated field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetPagingArgs {
    pub skip: Option<i32>,
    pub take: Option<i32>,
}

impl OffsetPagingArgs {
    pub fn from_selection(field: &FieldSelection) -> Self {
        Self {
            skip: int_argument(field, constants::SKIP),
            take: int_argument(field, constants::TAKE),
        }
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.skip.is_some() || self.take.is_some()
    }

    pub fn validate(&self) -> PreprocessResult<()> {
        match self.take {
            Some(take) if take < 0 => Err(PreprocessError::InvalidWindow(format!(
                "`{}` must be non-negative, got {take}",
                constants::TAKE
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cursor_args_from_selection() {
        let field = FieldSelection::new("characters")
            .arg("first", ConstValue::from(2))
            .arg("after", ConstValue::String("AgAAAA==".to_string()))
            .arg("last", ConstValue::String("ten".to_string()));

        let args = CursorPagingArgs::from_selection(&field);
        assert_eq!(
            args,
            CursorPagingArgs {
                first: Some(2),
                after: Some("AgAAAA==".to_string()),
                last: None,
                before: None,
            }
        );
        assert!(args.is_forward());
        assert!(!args.is_backward());
        assert!(args.is_paging_enabled());
        assert!(!CursorPagingArgs::default().is_paging_enabled());
    }

    #[test]
    fn test_cursor_args_reject_negative_window() {
        let args = CursorPagingArgs {
            last: Some(-1),
            ..Default::default()
        };

        assert!(matches!(
            args.validate(),
            Err(PreprocessError::InvalidWindow(_))
        ));
        assert!(CursorPagingArgs {
            first: Some(0),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_offset_args() {
        let field = FieldSelection::new("droids")
            .arg("skip", ConstValue::from(4))
            .arg("take", ConstValue::from(-2));

        let args = OffsetPagingArgs::from_selection(&field);
        assert_eq!(
            args,
            OffsetPagingArgs {
                skip: Some(4),
                take: Some(-2)
            }
        );
        assert!(args.is_paging_enabled());
        assert!(matches!(
            args.validate(),
            Err(PreprocessError::InvalidWindow(_))
        ));
        assert!(!OffsetPagingArgs::default().is_paging_enabled());
    }

    #[test]
    fn test_out_of_range_arguments_saturate() {
        let field = FieldSelection::new("droids")
            .arg("skip", ConstValue::from(5_000_000_000i64))
            .arg("take", ConstValue::from(-5_000_000_000i64));
        assert_eq!(
            OffsetPagingArgs::from_selection(&field),
            OffsetPagingArgs {
                skip: Some(i32::MAX),
                take: Some(i32::MIN),
            }
        );

        let field = FieldSelection::new("characters").arg("first", ConstValue::from(u64::MAX));
        assert_eq!(
            CursorPagingArgs::from_selection(&field).first,
            Some(i32::MAX)
        );
    }

    #[test]
    fn test_huge_skip_yields_empty_page() {
        let field = FieldSelection::new("droids")
            .arg("skip", ConstValue::from(5_000_000_000i64))
            .arg("take", ConstValue::from(2));

        let page = OffsetPagingArgs::from_selection(&field).slice(1..=5, 50, false);
        assert!(page.is_empty());
        assert!(!page.has_next_page);
    }
}

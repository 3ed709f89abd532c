//! Wire models for the puzzle backend.
//!
//! The backend emits loosely-typed JSON: numeric fields arrive as
//! strings (`"id": "7"`), the success flag as either a bool or
//! `"true"`/`"false"`, and solution cells as `"0"`/`"1"` strings. The
//! deserializers here accept all observed shapes; re-serialization
//! produces canonical numbers and keeps the `"0"`/`"1"` string form for
//! solution cells so cached records stay compatible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fetch and contract failures. Backend-signalled failure
/// (`success: false`) is treated identically to a transport error:
/// both block puzzle display and offer a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network-level failure before any response body was available.
    Transport(String),
    /// Non-OK HTTP status.
    Status(u16),
    /// The backend answered but signalled `success: false`.
    Failure,
    /// The response body did not match the contract.
    Decode(String),
    /// A fetch for the same logical resource is already in flight.
    InFlight,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "fetch failed: {}", e),
            Self::Status(code) => write!(f, "fetch failed: status {}", code),
            Self::Failure => write!(f, "backend reported failure"),
            Self::Decode(e) => write!(f, "malformed response: {}", e),
            Self::InFlight => write!(f, "fetch already in flight"),
        }
    }
}

impl std::error::Error for ApiError {}

/// A puzzle record as served by the catalog. `task` is the solution
/// grid, row-major, true = filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(with = "solution_cells")]
    pub task: Vec<bool>,
    #[serde(with = "lenient_u32")]
    pub width: u32,
    #[serde(with = "lenient_u32")]
    pub height: u32,
    #[serde(default)]
    pub image_preview: String,
    #[serde(default)]
    pub image_solved: String,
}

/// One site-news entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub date: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct TaskListResponse {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(with = "lenient_bool", default)]
    success: bool,
}

// The single-task endpoint emits the puzzle fields flat beside the
// success flag.
#[derive(Debug, Deserialize)]
struct TaskResponse {
    #[serde(flatten)]
    task: Task,
    #[serde(with = "lenient_bool", default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
    #[serde(with = "lenient_bool", default)]
    success: bool,
}

/// Bare failure envelope, the only body the backend produces when it
/// cannot serve a request.
#[derive(Debug, Deserialize)]
struct StatusOnly {
    #[serde(with = "lenient_bool", default)]
    success: bool,
}

/// Decodes the list endpoint body, mapping `success: false` to
/// [`ApiError::Failure`].
pub fn parse_task_list(body: &str) -> Result<Vec<Task>, ApiError> {
    let response: TaskListResponse =
        serde_json::from_str(body).map_err(|e| decode_or_failure(body, e))?;
    if !response.success {
        return Err(ApiError::Failure);
    }
    Ok(response.tasks)
}

/// Decodes the single-task endpoint body.
pub fn parse_task(body: &str) -> Result<Task, ApiError> {
    match serde_json::from_str::<TaskResponse>(body) {
        Ok(response) if response.success => Ok(response.task),
        Ok(_) => Err(ApiError::Failure),
        Err(e) => Err(decode_or_failure(body, e)),
    }
}

/// Decodes the news endpoint body.
pub fn parse_news(body: &str) -> Result<Vec<NewsItem>, ApiError> {
    let response: NewsResponse =
        serde_json::from_str(body).map_err(|e| decode_or_failure(body, e))?;
    if !response.success {
        return Err(ApiError::Failure);
    }
    Ok(response.news)
}

// A failure envelope has none of the payload fields, so payload
// decoding fails before the success flag is seen; check for it before
// reporting a malformed body.
fn decode_or_failure(body: &str, error: serde_json::Error) -> ApiError {
    match serde_json::from_str::<StatusOnly>(body) {
        Ok(status) if !status.success => ApiError::Failure,
        _ => ApiError::Decode(error.to_string()),
    }
}

mod lenient_u32 {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct U32Visitor;

        impl Visitor<'_> for U32Visitor {
            type Value = u32;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an unsigned integer or a numeric string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value).map_err(|_| E::custom(format!("{} out of range", value)))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value).map_err(|_| E::custom(format!("{} out of range", value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid number: {:?}", value)))
            }
        }

        deserializer.deserialize_any(U32Visitor)
    }
}

mod lenient_bool {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BoolVisitor;

        impl Visitor<'_> for BoolVisitor {
            type Value = bool;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a bool or "true"/"false""#)
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match value {
                    "true" => Ok(true),
                    "false" => Ok(false),
                    other => Err(E::custom(format!("invalid flag: {:?}", other))),
                }
            }
        }

        deserializer.deserialize_any(BoolVisitor)
    }
}

mod solution_cells {
    use serde::de::{self, SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt;

    /// Serialized as the backend's `"0"`/`"1"` strings.
    pub fn serialize<S>(cells: &[bool], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(cells.len()))?;
        for &filled in cells {
            seq.serialize_element(if filled { "1" } else { "0" })?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Bit(bool);

        impl<'de> Deserialize<'de> for Bit {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct BitVisitor;

                impl Visitor<'_> for BitVisitor {
                    type Value = Bit;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str(r#"a solution cell: "0", "1", 0, or 1"#)
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
                    where
                        E: de::Error,
                    {
                        match value {
                            "0" => Ok(Bit(false)),
                            "1" => Ok(Bit(true)),
                            other => {
                                Err(E::custom(format!("invalid solution cell: {:?}", other)))
                            }
                        }
                    }

                    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
                    where
                        E: de::Error,
                    {
                        match value {
                            0 => Ok(Bit(false)),
                            1 => Ok(Bit(true)),
                            other => Err(E::custom(format!("invalid solution cell: {}", other))),
                        }
                    }

                    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
                    where
                        E: de::Error,
                    {
                        self.visit_u64(value as u64)
                    }
                }

                deserializer.deserialize_any(BitVisitor)
            }
        }

        struct CellsVisitor;

        impl<'de> Visitor<'de> for CellsVisitor {
            type Value = Vec<bool>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of solution cells")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut cells = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(Bit(filled)) = seq.next_element()? {
                    cells.push(filled);
                }
                Ok(cells)
            }
        }

        deserializer.deserialize_seq(CellsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The list endpoint emits every scalar as a string.
    const PHP_LIST: &str = r#"{
        "tasks": [
            {
                "id": "7",
                "name": "Heart",
                "task": ["1", "0", "0", "1"],
                "width": "2",
                "height": "2",
                "image_preview": "/imgs/7p.png",
                "image_solved": "/imgs/7s.png"
            }
        ],
        "success": "true"
    }"#;

    #[test]
    fn test_parses_string_typed_list() {
        let tasks = parse_task_list(PHP_LIST).unwrap();
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.id, 7);
        assert_eq!(task.name, "Heart");
        assert_eq!(task.task, vec![true, false, false, true]);
        assert_eq!((task.width, task.height), (2, 2));
    }

    #[test]
    fn test_parses_number_typed_list() {
        let body = r#"{"tasks":[{"id":3,"name":"Dot","task":[1,0],"width":2,"height":1,
            "image_preview":"","image_solved":""}],"success":true}"#;
        let tasks = parse_task_list(body).unwrap();
        assert_eq!(tasks[0].id, 3);
        assert_eq!(tasks[0].task, vec![true, false]);
    }

    #[test]
    fn test_list_failure_flag() {
        assert_eq!(
            parse_task_list(r#"{"success": "false"}"#),
            Err(ApiError::Failure)
        );
        assert_eq!(
            parse_task_list(r#"{"tasks": [], "success": false}"#),
            Err(ApiError::Failure)
        );
    }

    #[test]
    fn test_single_task_is_flat() {
        let body = r#"{
            "id": "7", "name": "Heart", "task": ["1","0","0","1"],
            "width": "2", "height": "2",
            "image_preview": "", "image_solved": "",
            "success": "true"
        }"#;
        let task = parse_task(body).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.task.len(), 4);
    }

    #[test]
    fn test_single_task_failure_envelope() {
        assert_eq!(parse_task(r#"{"success": "false"}"#), Err(ApiError::Failure));
    }

    #[test]
    fn test_truncated_body_is_a_decode_error() {
        assert!(matches!(
            parse_task_list(r#"{"tasks": ["#),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(parse_task("not json"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_missing_success_flag_is_a_failure() {
        // A non-true success flag, including an absent one, blocks the
        // response.
        assert_eq!(parse_task("{}"), Err(ApiError::Failure));
        assert_eq!(parse_task_list(r#"{"tasks": []}"#), Err(ApiError::Failure));
    }

    #[test]
    fn test_rejects_bad_solution_cell() {
        let body = r#"{"id":1,"name":"","task":["2"],"width":1,"height":1,"success":true}"#;
        assert!(matches!(parse_task(body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_cached_task_round_trips() {
        let tasks = parse_task_list(PHP_LIST).unwrap();
        let json = serde_json::to_string(&tasks[0]).unwrap();
        // Solution cells keep their wire string form.
        assert!(json.contains(r#""task":["1","0","0","1"]"#));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tasks[0]);
    }

    #[test]
    fn test_parses_news() {
        let body = r#"{"news":[{"date":"2024-01-05","text":"New puzzles"}],"success":true}"#;
        let news = parse_news(body).unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].date, "2024-01-05");

        assert_eq!(parse_news(r#"{"success":"false"}"#), Err(ApiError::Failure));
    }
}

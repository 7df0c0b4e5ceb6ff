//! Content blocks accepted by `notion_add_page_content`

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use totool_core::schema::{Field, FieldType, ObjectSchema};

/// Plain text wrapper, `{"text": {"content": "..."}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

impl TextBlock {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

/// One block of caller-supplied content, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockContent {
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBlock },
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBlock },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBlock },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: TextBlock },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextBlock },
}

impl BlockContent {
    pub const TYPES: [&'static str; 5] = [
        "paragraph",
        "heading_1",
        "heading_2",
        "heading_3",
        "bulleted_list_item",
    ];

    pub fn block_type(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading1 { .. } => "heading_1",
            Self::Heading2 { .. } => "heading_2",
            Self::Heading3 { .. } => "heading_3",
            Self::BulletedListItem { .. } => "bulleted_list_item",
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::Paragraph { paragraph: block }
            | Self::Heading1 { heading_1: block }
            | Self::Heading2 { heading_2: block }
            | Self::Heading3 { heading_3: block }
            | Self::BulletedListItem {
                bulleted_list_item: block,
            } => &block.text.content,
        }
    }

    /// Block object in the shape the append-children endpoint expects
    pub fn to_request(&self) -> Value {
        let block_type = self.block_type();
        let mut request = json!({
            "object": "block",
            "type": block_type,
        });
        request[block_type] = json!({
            "rich_text": [{
                "type": "text",
                "text": { "content": self.text() },
            }],
        });
        request
    }

    /// Schema for one block: a union of the supported block shapes
    pub fn schema() -> FieldType {
        let text = FieldType::object(ObjectSchema::new().field(Field::new(
            "text",
            FieldType::object(ObjectSchema::new().field(Field::new("content", FieldType::string()))),
        )));

        FieldType::one_of(
            Self::TYPES
                .iter()
                .map(|block_type| {
                    FieldType::object(
                        ObjectSchema::new()
                            .field(Field::new("type", FieldType::literal(*block_type)))
                            .field(Field::new(*block_type, text.clone())),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_and_transform() {
        let block: BlockContent = serde_json::from_value(json!({
            "type": "heading_2",
            "heading_2": {"text": {"content": "Overview"}}
        }))
        .unwrap();

        assert_eq!(
            block,
            BlockContent::Heading2 {
                heading_2: TextBlock::new("Overview")
            }
        );
        assert_eq!(
            block.to_request(),
            json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": {
                    "rich_text": [{"type": "text", "text": {"content": "Overview"}}]
                }
            })
        );
    }

    #[test]
    fn test_schema_accepts_known_shapes_only() {
        let schema = ObjectSchema::new().field(Field::new("block", BlockContent::schema()));

        assert!(
            schema
                .validate(&json!({"block": {
                    "type": "bulleted_list_item",
                    "bulleted_list_item": {"text": {"content": "one"}}
                }}))
                .is_ok()
        );

        // type and payload key disagree
        assert!(
            schema
                .validate(&json!({"block": {
                    "type": "paragraph",
                    "heading_1": {"text": {"content": "x"}}
                }}))
                .is_err()
        );

        assert!(
            schema
                .validate(&json!({"block": {"type": "to_do", "to_do": {"text": {"content": "x"}}}}))
                .is_err()
        );
    }
}

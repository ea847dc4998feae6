//! Tree node model.
//!
//! A tree is built from two node kinds: [`Folder`], which owns an ordered
//! set of uniquely named children, and [`File`], which holds its content
//! together with a [`ContentKind`] that decides how that content is read.
//!
//! # Examples
//!
//! ```
//! use sharetree_store::{ContentKind, File, Folder, Node};
//!
//! let mut folder = Folder::new("docs");
//! folder.insert(Node::File(File::new("a.txt", "hello", "text/plain")));
//!
//! let file = folder.file("a.txt").unwrap();
//! assert_eq!(file.payload_bytes().unwrap(), b"hello");
//! assert!(!file.kind().is_binary());
//! ```

use crate::types::validate_name;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// MIME prefix that marks base64 data-reference payloads.
const BINARY_PREFIX: &str = "image/";

/// How a file's content must be interpreted.
///
/// The kind is decided once, from the MIME-like tag, when the value is
/// constructed. Kinds starting with `image/` carry a base64 data reference
/// (`data:<mime>;base64,<payload>`); every other kind is stored verbatim.
///
/// # Examples
///
/// ```
/// use sharetree_store::ContentKind;
///
/// assert!(ContentKind::from("image/png").is_binary());
/// assert!(!ContentKind::from("text/plain").is_binary());
/// assert!(!ContentKind::from("").is_binary());
/// assert_eq!(ContentKind::from("image/png").as_str(), "image/png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentKind {
    /// Base64 data-reference payload, tagged with its MIME type
    Binary(String),
    /// Plain text payload, tagged with its MIME type (possibly empty)
    Text(String),
}

impl ContentKind {
    /// Returns `true` if the content is a base64 data reference.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// Returns the original MIME-like tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Binary(mime) | Self::Text(mime) => mime,
        }
    }
}

impl Default for ContentKind {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for ContentKind {
    fn from(mime: String) -> Self {
        if mime.starts_with(BINARY_PREFIX) {
            Self::Binary(mime)
        } else {
            Self::Text(mime)
        }
    }
}

impl From<&str> for ContentKind {
    fn from(mime: &str) -> Self {
        Self::from(mime.to_string())
    }
}

impl From<ContentKind> for String {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Binary(mime) | ContentKind::Text(mime) => mime,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    name: String,
    content: String,
    #[serde(rename = "fileType")]
    kind: ContentKind,
}

impl File {
    /// Creates a file with the given content and kind.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        kind: impl Into<ContentKind>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: kind.into(),
        }
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored content exactly as it was created.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the content kind.
    #[must_use]
    pub const fn kind(&self) -> &ContentKind {
        &self.kind
    }

    /// Returns the size of the stored content in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.content.len()
    }

    /// Decodes the content into the bytes it represents.
    ///
    /// Binary content is a data reference whose payload follows the first
    /// comma; that payload is base64-decoded. Content without a comma is
    /// decoded as bare base64. Text content is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns a decode error if a binary payload is not valid base64.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_store::File;
    ///
    /// let pic = File::new("pic.png", "data:image/png;base64,QUJD", "image/png");
    /// assert_eq!(pic.payload_bytes().unwrap(), b"ABC");
    /// ```
    pub fn payload_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match self.kind {
            ContentKind::Binary(_) => {
                let payload = self
                    .content
                    .split_once(',')
                    .map_or(self.content.as_str(), |(_, payload)| payload);
                BASE64.decode(payload)
            }
            ContentKind::Text(_) => Ok(self.content.as_bytes().to_vec()),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// A folder node owning its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    name: String,
    children: Children,
}

impl Folder {
    /// Creates an empty folder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Children::default(),
        }
    }

    /// Returns the folder name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.0.iter()
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.0.len()
    }

    /// Returns `true` if the folder has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.0.is_empty()
    }

    /// Returns the child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.position(name).map(|i| &self.children.0[i])
    }

    /// Returns the child folder with the given name.
    #[must_use]
    pub fn folder(&self, name: &str) -> Option<&Self> {
        match self.child(name) {
            Some(Node::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    /// Returns the child file with the given name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&File> {
        match self.child(name) {
            Some(Node::File(file)) => Some(file),
            _ => None,
        }
    }

    /// Counts the files in this folder's whole subtree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.children()
            .map(|child| match child {
                Node::Folder(folder) => folder.file_count(),
                Node::File(_) => 1,
            })
            .sum()
    }

    /// Number of folder levels beneath this folder; 0 without subfolders.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children()
            .filter_map(|child| match child {
                Node::Folder(folder) => Some(folder.depth() + 1),
                Node::File(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Inserts a child under its own name.
    ///
    /// An existing child with the same name is replaced in place and
    /// returned; a new name is appended after the existing children.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        match self.children.position(node.name()) {
            Some(i) => Some(std::mem::replace(&mut self.children.0[i], node)),
            None => {
                self.children.0.push(node);
                None
            }
        }
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        let index = self.children.position(name)?;
        Some(&mut self.children.0[index])
    }

    pub(crate) fn folder_mut(&mut self, name: &str) -> Option<&mut Self> {
        match self.child_mut(name) {
            Some(Node::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Node> {
        self.children
            .position(name)
            .map(|i| self.children.0.remove(i))
    }
}

/// A tree node: either a folder or a file.
///
/// Serialized with a `type` tag of `"folder"` or `"file"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// A folder and its subtree
    Folder(Folder),
    /// A file
    File(File),
}

impl Node {
    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => folder.name(),
            Self::File(file) => file.name(),
        }
    }

    /// Returns `true` for folder nodes.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Folder(folder) => folder.name = name,
            Self::File(file) => file.set_name(name),
        }
    }
}

/// Ordered children serialized as a JSON object keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Children(Vec<Node>);

impl Children {
    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|node| node.name() == name)
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in &self.0 {
            map.serialize_entry(node.name(), node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChildrenVisitor;

        impl<'de> Visitor<'de> for ChildrenVisitor {
            type Value = Children;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of child names to nodes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Children, A::Error> {
                let mut folder = Folder::new("");
                while let Some((key, node)) = access.next_entry::<String, Node>()? {
                    validate_name(&key).map_err(de::Error::custom)?;
                    if key != node.name() {
                        return Err(de::Error::custom(format!(
                            "child key '{key}' does not match node name '{}'",
                            node.name()
                        )));
                    }
                    folder.insert(node);
                }
                Ok(folder.children)
            }
        }

        deserializer.deserialize_map(ChildrenVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str, content: &str) -> Node {
        Node::File(File::new(name, content, "text/plain"))
    }

    #[test]
    fn test_folder_depth_counts_deepest_branch() {
        let mut inner = Folder::new("b");
        inner.insert(Node::Folder(Folder::new("c")));
        let mut outer = Folder::new("a");
        outer.insert(Node::Folder(inner));
        outer.insert(text("x.txt", "x"));

        assert_eq!(Folder::new("empty").depth(), 0);
        assert_eq!(outer.depth(), 2);
    }

    #[test]
    fn test_content_kind_classification() {
        assert!(ContentKind::from("image/jpeg").is_binary());
        assert!(!ContentKind::from("application/json").is_binary());
        assert!(!ContentKind::from("imagery").is_binary());
        assert_eq!(ContentKind::default().as_str(), "");
    }

    #[test]
    fn test_payload_bytes_binary() {
        let file = File::new("a.png", "data:image/png;base64,QUJD", "image/png");
        assert_eq!(file.payload_bytes().unwrap(), b"ABC");
    }

    #[test]
    fn test_payload_bytes_bare_base64() {
        let file = File::new("a.png", "QUJD", "image/png");
        assert_eq!(file.payload_bytes().unwrap(), b"ABC");
    }

    #[test]
    fn test_payload_bytes_invalid_base64() {
        let file = File::new("a.png", "data:image/png;base64,@@@", "image/png");
        assert!(file.payload_bytes().is_err());
    }

    #[test]
    fn test_payload_bytes_text_verbatim() {
        let file = File::new("a.txt", "data:x,y", "text/plain");
        assert_eq!(file.payload_bytes().unwrap(), b"data:x,y");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut folder = Folder::new("f");
        folder.insert(text("a", "1"));
        folder.insert(text("b", "2"));
        let old = folder.insert(text("a", "3"));

        assert_eq!(old, Some(text("a", "1")));
        let names: Vec<_> = folder.children().map(Node::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(folder.file("a").unwrap().content(), "3");
    }

    #[test]
    fn test_file_count_recursive() {
        let mut inner = Folder::new("inner");
        inner.insert(text("x", ""));
        inner.insert(text("y", ""));
        let mut outer = Folder::new("outer");
        outer.insert(Node::Folder(inner));
        outer.insert(text("z", ""));
        outer.insert(Node::Folder(Folder::new("empty")));

        assert_eq!(outer.file_count(), 3);
        assert_eq!(outer.len(), 3);
    }

    #[test]
    fn test_serialized_shape() {
        let mut folder = Folder::new("root");
        folder.insert(Node::File(File::new("pic.png", "data:,QQ==", "image/png")));
        let json = serde_json::to_value(Node::Folder(folder)).unwrap();

        assert_eq!(json["type"], "folder");
        assert_eq!(json["name"], "root");
        assert_eq!(json["children"]["pic.png"]["type"], "file");
        assert_eq!(json["children"]["pic.png"]["fileType"], "image/png");
        assert_eq!(json["children"]["pic.png"]["content"], "data:,QQ==");
    }

    #[test]
    fn test_deserialize_rejects_key_mismatch() {
        let json = r#"{"name":"root","type":"folder","children":{"a":{"name":"b","type":"folder","children":{}}}}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let json = r#"{"name":"root","type":"folder","children":{
            "z":{"name":"z","type":"folder","children":{}},
            "a":{"name":"a","type":"file","content":"","fileType":""}}}"#;
        let Node::Folder(root) = serde_json::from_str::<Node>(json).unwrap() else {
            panic!("expected folder");
        };
        let names: Vec<_> = root.children().map(Node::name).collect();
        assert_eq!(names, vec!["z", "a"]);
    }
}

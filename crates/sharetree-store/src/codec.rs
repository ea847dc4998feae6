//! Whole-tree serialization.
//!
//! The tree is encoded as JSON: folders as
//! `{"name": .., "type": "folder", "children": {<name>: <node>, ..}}` and files
//! as `{"name": .., "type": "file", "content": .., "fileType": ..}`.
//! Decoding either yields a complete, checked tree or an error; there is no
//! partial result. Both directions refuse trees nested deeper than
//! [`MAX_DEPTH`], so anything that encodes also decodes.

use crate::node::{Folder, Node};
use crate::types::{MAX_DEPTH, Result, StoreError};
use serde::Serialize;

#[derive(Serialize)]
struct TaggedRoot<'a> {
    #[serde(rename = "type")]
    tag: &'static str,
    #[serde(flatten)]
    folder: &'a Folder,
}

impl<'a> TaggedRoot<'a> {
    const fn new(folder: &'a Folder) -> Self {
        Self {
            tag: "folder",
            folder,
        }
    }
}

/// Encodes a root folder and its subtree as compact JSON.
///
/// # Errors
///
/// Returns `StoreError::MalformedState` if serialization fails.
///
/// # Examples
///
/// ```
/// use sharetree_store::{Folder, codec};
///
/// let text = codec::encode_tree(&Folder::new("root")).unwrap();
/// assert!(text.contains(r#""type":"folder""#));
/// assert_eq!(codec::decode_tree(&text).unwrap(), Folder::new("root"));
/// ```
pub fn encode_tree(root: &Folder) -> Result<String> {
    check_nesting(root)?;
    serde_json::to_string(&TaggedRoot::new(root)).map_err(encode_error)
}

/// Encodes a root folder as indented JSON.
///
/// # Errors
///
/// Returns `StoreError::MalformedState` if serialization fails.
pub fn encode_tree_pretty(root: &Folder) -> Result<String> {
    check_nesting(root)?;
    serde_json::to_string_pretty(&TaggedRoot::new(root)).map_err(encode_error)
}

/// Decodes a root folder from JSON produced by [`encode_tree`].
///
/// Child keys must match node names and every name must be valid.
///
/// # Errors
///
/// Returns `StoreError::MalformedState` if the text does not parse, has the
/// wrong shape, or its root is a file.
///
/// # Examples
///
/// ```
/// use sharetree_store::codec;
///
/// assert!(codec::decode_tree("[]").unwrap_err().is_malformed());
/// assert!(codec::decode_tree(r#"{"name":"x","type":"file","content":"","fileType":""}"#).is_err());
/// ```
pub fn decode_tree(text: &str) -> Result<Folder> {
    let node: Node = serde_json::from_str(text).map_err(|e| StoreError::MalformedState {
        message: e.to_string(),
        source: Some(e),
    })?;
    match node {
        Node::Folder(root) => {
            check_nesting(&root)?;
            Ok(root)
        }
        Node::File(file) => Err(StoreError::MalformedState {
            message: format!("root must be a folder, found file '{}'", file.name()),
            source: None,
        }),
    }
}

fn check_nesting(root: &Folder) -> Result<()> {
    let depth = root.depth();
    if depth > MAX_DEPTH {
        return Err(StoreError::MalformedState {
            message: format!("tree nests {depth} folders deep, limit is {MAX_DEPTH}"),
            source: None,
        });
    }
    Ok(())
}

fn encode_error(e: serde_json::Error) -> StoreError {
    StoreError::MalformedState {
        message: format!("failed to encode tree: {e}"),
        source: Some(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::File;

    fn sample() -> Folder {
        let mut docs = Folder::new("docs");
        docs.insert(Node::File(File::new("readme.txt", "hello", "text/plain")));
        docs.insert(Node::Folder(Folder::new("empty")));

        let mut root = Folder::new("root");
        root.insert(Node::Folder(docs));
        root.insert(Node::File(File::new(
            "pic.png",
            "data:image/png;base64,QUJD",
            "image/png",
        )));
        root
    }

    #[test]
    fn test_roundtrip_nested_tree() {
        let root = sample();
        let decoded = decode_tree(&encode_tree(&root).unwrap()).unwrap();
        assert_eq!(decoded, root);
    }

    fn nested(levels: usize) -> Folder {
        let mut folder = Folder::new("d");
        folder.insert(Node::File(File::new("leaf.txt", "leaf", "text/plain")));
        for _ in 1..levels {
            let mut outer = Folder::new("d");
            outer.insert(Node::Folder(folder));
            folder = outer;
        }
        let mut root = Folder::new("root");
        root.insert(Node::Folder(folder));
        root
    }

    #[test]
    fn test_roundtrip_at_depth_limit() {
        let root = nested(MAX_DEPTH);
        assert_eq!(root.depth(), MAX_DEPTH);
        let decoded = decode_tree(&encode_tree(&root).unwrap()).unwrap();
        assert_eq!(decoded, root);
        assert_eq!(decode_tree(&encode_tree_pretty(&root).unwrap()).unwrap(), root);
    }

    #[test]
    fn test_over_deep_tree_rejected_both_ways() {
        let root = nested(MAX_DEPTH + 1);
        assert!(encode_tree(&root).unwrap_err().is_malformed());

        let inner = serde_json::to_string(&TaggedRoot::new(&root)).unwrap();
        assert!(decode_tree(&inner).unwrap_err().is_malformed());
    }

    #[test]
    fn test_pretty_decodes_identically() {
        let root = sample();
        let pretty = encode_tree_pretty(&root).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(decode_tree(&pretty).unwrap(), root);
    }

    #[test]
    fn test_decode_legacy_shape() {
        let text = r#"{"name":"root","type":"folder","children":{"docs":{"name":"docs","type":"folder","children":{"readme.txt":{"name":"readme.txt","type":"file","content":"hello","fileType":"text/plain"}}}}}"#;
        let root = decode_tree(text).unwrap();
        let file = root.folder("docs").unwrap().file("readme.txt").unwrap();
        assert_eq!(file.content(), "hello");
        assert_eq!(file.kind().as_str(), "text/plain");
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        for text in [
            "",
            "null",
            "{not json",
            r#"{"name":"root","type":"folder"}"#,
            r#"{"name":"root","type":"folder","children":[]}"#,
            r#"{"name":"root","type":"link","children":{}}"#,
            r#"{"name":"root","type":"folder","children":{"":{"name":"","type":"folder","children":{}}}}"#,
            r#"{"name":"root","type":"folder","children":{"a":{"name":"a","type":"file","content":1,"fileType":""}}}"#,
        ] {
            let err = decode_tree(text).unwrap_err();
            assert!(err.is_malformed(), "accepted {text:?}");
        }
    }
}

//! Bundle fingerprinting
//!
//! Provides [`BundleFingerprint`] - a Merkle tree over document content
//! hashes, built in topic-path order. The root identifies the exact
//! content of a bundle, and per-document proofs show that a single
//! document belongs to a fingerprinted bundle.

use rs_merkle::{Hasher, MerkleTree as RsMerkleTree};

use crate::hash::ContentHash;
use crate::topic::TopicPath;

/// Merkle fingerprint of an entire bundle
///
/// Leaves are document content hashes ordered by topic path, so the
/// root is canonical: two bundles with the same documents produce the
/// same fingerprint regardless of scan order.
pub struct BundleFingerprint {
    tree: RsMerkleTree<Blake3Hasher>,
    paths: Vec<TopicPath>,
}

impl std::fmt::Debug for BundleFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleFingerprint")
            .field("doc_count", &self.doc_count())
            .field("root", &self.root())
            .finish()
    }
}

impl Clone for BundleFingerprint {
    fn clone(&self) -> Self {
        // Rebuild from leaves since RsMerkleTree doesn't implement Clone
        let leaves: Vec<_> = match self.tree.leaves() {
            Some(leaves) => leaves.to_vec(),
            None => Vec::new(),
        };
        Self {
            tree: RsMerkleTree::from_leaves(&leaves),
            paths: self.paths.clone(),
        }
    }
}

impl BundleFingerprint {
    /// Create an empty fingerprint
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tree: RsMerkleTree::new(),
            paths: Vec::new(),
        }
    }

    /// Build a fingerprint from document entries
    ///
    /// Entries are sorted by topic path before hashing, so input order
    /// does not matter.
    ///
    /// # Performance
    /// O(n log n) where n = number of documents
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (TopicPath, ContentHash)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let leaves: Vec<_> = entries.iter().map(|(_, h)| *h.as_bytes()).collect();
        let paths = entries.into_iter().map(|(p, _)| p).collect();
        Self {
            tree: RsMerkleTree::from_leaves(&leaves),
            paths,
        }
    }

    /// Root hash of the fingerprint
    ///
    /// Returns zero hash for an empty bundle.
    #[inline]
    #[must_use]
    pub fn root(&self) -> ContentHash {
        match self.tree.root() {
            Some(root) => ContentHash::new(root),
            None => ContentHash::default(),
        }
    }

    /// Number of documents covered
    #[inline]
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.paths.len()
    }

    /// Check if the fingerprint covers no documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Topic paths in leaf order
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &[TopicPath] {
        &self.paths
    }

    /// Leaf index of a topic path
    #[inline]
    #[must_use]
    pub fn index_of(&self, path: &TopicPath) -> Option<usize> {
        self.paths.binary_search(path).ok()
    }

    /// Generate a membership proof for one document
    ///
    /// Returns None if the path is not covered by this fingerprint.
    #[must_use]
    pub fn proof_for(&self, path: &TopicPath) -> Option<DocProof> {
        let index = self.index_of(path)?;
        Some(DocProof {
            inner: self.tree.proof(&[index]),
            leaf_index: index,
        })
    }

    /// Verify that a document hash belongs to this fingerprint
    #[inline]
    #[must_use]
    pub fn verify_doc(&self, hash: ContentHash, proof: &DocProof) -> bool {
        proof.verify(hash, self.root(), self.doc_count())
    }
}

impl Default for BundleFingerprint {
    fn default() -> Self {
        Self::empty()
    }
}

/// Membership proof for a single document
pub struct DocProof {
    inner: rs_merkle::MerkleProof<Blake3Hasher>,
    leaf_index: usize,
}

impl std::fmt::Debug for DocProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocProof")
            .field("leaf_index", &self.leaf_index)
            .finish()
    }
}

impl DocProof {
    /// Leaf index this proof speaks for
    #[inline]
    #[must_use]
    pub const fn leaf_index(&self) -> usize {
        self.leaf_index
    }

    /// Verify this proof against a root
    #[inline]
    #[must_use]
    pub fn verify(&self, leaf: ContentHash, root: ContentHash, total_leaves: usize) -> bool {
        self.inner.verify(
            *root.as_bytes(),
            &[self.leaf_index],
            &[*leaf.as_bytes()],
            total_leaves,
        )
    }
}

/// Blake3 hasher adapter for rs_merkle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    type Hash = [u8; 32];

    #[inline]
    fn hash(data: &[u8]) -> Self::Hash {
        *blake3::hash(data).as_bytes()
    }
}

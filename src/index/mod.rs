mod btree_internal_page;
mod btree_leaf_page;
mod btree_page;
mod key_comparator;

pub use btree_internal_page::BTreeInternalPage;
pub use btree_leaf_page::BTreeLeafPage;
pub use btree_page::{BTreePageMut, BTreePageRef, IndexPageType};
pub use key_comparator::{GenericComparator, GenericKey, KeyComparator};

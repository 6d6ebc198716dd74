/// Options used when constructing a [`BaseDocument`](crate::BaseDocument)
#[derive(Default, Clone, Debug)]
pub struct DocumentConfig {
    /// Tag name of the element created when a run of nodes has to be wrapped
    /// in a new container. Defaults to `div`.
    pub wrapper_tag: Option<String>,
    /// Additional tag names (case-insensitive) which are treated as block elements
    /// on top of the built-in table.
    pub extra_block_tags: Option<Vec<String>>,
    /// Whether structural splits verify that the leaf sequence is unchanged.
    /// Defaults to `true`.
    pub verify_splits: Option<bool>,
}

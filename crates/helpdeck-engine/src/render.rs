//! Section assembly: grouping a flat block sequence into a rendered
//! document tree.
//!
//! The tree is an immutable view for render sinks: top-level blocks
//! plus named collapsible sections, each owning the blocks that follow
//! its heading. Sinks render from it and never reach back into the
//! parser.

use crate::parsing::blocks::Block;

/// Fallback paragraph appended when a document has no collapsible
/// sections at all.
pub const NO_SECTIONS_NOTICE: &str =
    "No section headers found. Add ## headings for collapsible sections.";

/// A collapsible grouping of blocks owned by a level-2/3 heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Heading level that opened the section: 2 or 3.
    pub level: u8,
    pub expanded: bool,
    pub blocks: Vec<Block>,
}

/// One top-level entry of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// A block outside any section.
    SingleBlock(Block),
    /// A collapsible section with its owned blocks.
    Section(Section),
}

/// The assembled two-level document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub nodes: Vec<RenderNode>,
    pub had_any_section: bool,
}

impl RenderedDocument {
    /// Applies one expanded state to every section uniformly.
    ///
    /// There is no per-section memory: the expand/collapse toggle is a
    /// single document-wide flag.
    pub fn set_sections_expanded(&mut self, expanded: bool) {
        for node in &mut self.nodes {
            if let RenderNode::Section(section) = node {
                section.expanded = expanded;
            }
        }
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.nodes.iter().filter_map(|node| match node {
            RenderNode::Section(section) => Some(section),
            RenderNode::SingleBlock(_) => None,
        })
    }

    /// Code block texts in document order, top level and sections
    /// alike. Render sinks use this to wire copy affordances.
    pub fn code_blocks(&self) -> Vec<&str> {
        let mut code = Vec::new();
        for node in &self.nodes {
            match node {
                RenderNode::SingleBlock(block) => collect_code(block, &mut code),
                RenderNode::Section(section) => {
                    for block in &section.blocks {
                        collect_code(block, &mut code);
                    }
                }
            }
        }
        code
    }
}

fn collect_code<'a>(block: &'a Block, out: &mut Vec<&'a str>) {
    if let Block::Code { text } = block {
        out.push(text);
    }
}

/// Assembles a block sequence into a rendered document tree.
///
/// A level-2 or level-3 heading starts a new section; every following
/// block up to the next such heading belongs to it. Sections do not
/// nest. Level-1 headings never open a section - they stay plain
/// blocks wherever they fall, top level or inside the current section.
/// New sections always start expanded.
pub fn build_document(blocks: Vec<Block>) -> RenderedDocument {
    let mut nodes: Vec<RenderNode> = Vec::new();
    let mut had_any_section = false;

    for block in blocks {
        match block {
            Block::Heading { level, text } if level == 2 || level == 3 => {
                had_any_section = true;
                nodes.push(RenderNode::Section(Section {
                    title: text,
                    level,
                    expanded: true,
                    blocks: Vec::new(),
                }));
            }
            other => match nodes.last_mut() {
                // A section stays current until the next qualifying
                // heading, so everything after it attaches here.
                Some(RenderNode::Section(section)) => section.blocks.push(other),
                _ => nodes.push(RenderNode::SingleBlock(other)),
            },
        }
    }

    if !had_any_section {
        nodes.push(RenderNode::SingleBlock(Block::Paragraph {
            text: NO_SECTIONS_NOTICE.to_string(),
        }));
    }

    RenderedDocument {
        nodes,
        had_any_section,
    }
}

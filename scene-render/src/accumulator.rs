//! The stack of inherited drawing attributes during a traversal.

use crate::style::{AttributeKind, Style};

/// Accumulated style plus the ignore-fill flag, with save/restore scoping.
///
/// The flag is set by the path builder when it emits an open sub-path and
/// tells the path renderer to skip the fill.
#[derive(Debug, Clone, Default)]
pub struct StyleAccumulator {
    style: Style,
    ignore_fill: bool,
    stack: Vec<(Style, bool)>,
}

impl StyleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self) {
        self.stack.push((self.style.clone(), self.ignore_fill));
    }

    /// Drop everything since the matching `save`.
    ///
    /// # Panics
    ///
    /// Panics when there is no matching `save`.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some((style, ignore_fill)) => {
                self.style = style;
                self.ignore_fill = ignore_fill;
            }
            None => panic!("restore without matching save"),
        }
    }

    /// Compose `style` on top of the accumulated style.
    pub fn merge_style(&mut self, style: &Style) {
        self.style.merge(style);
    }

    /// The innermost value of attribute kind `K`.
    pub fn attribute<K: AttributeKind>(&self) -> Option<K::Value> {
        self.style.get::<K>().cloned()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_ignore_fill(&mut self, ignore: bool) {
        self.ignore_fill = ignore;
    }

    pub fn ignore_fill(&self) -> bool {
        self.ignore_fill
    }

    /// Number of saves not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::attr;

    #[test]
    fn test_restore_discards_merges() {
        let mut acc = StyleAccumulator::new();
        acc.merge_style(&Style::new().line_width(1.0));
        acc.save();
        acc.merge_style(&Style::new().line_width(4.0).font_size(20.0));
        assert_eq!(acc.attribute::<attr::LineWidth>(), Some(4.0));
        assert_eq!(acc.depth(), 1);
        acc.restore();
        assert_eq!(acc.attribute::<attr::LineWidth>(), Some(1.0));
        assert_eq!(acc.attribute::<attr::FontSize>(), None);
        assert_eq!(acc.depth(), 0);
    }

    #[test]
    fn test_ignore_fill_is_scoped() {
        let mut acc = StyleAccumulator::new();
        acc.save();
        acc.set_ignore_fill(true);
        assert!(acc.ignore_fill());
        acc.restore();
        assert!(!acc.ignore_fill());
    }

    #[test]
    #[should_panic(expected = "restore without matching save")]
    fn test_unmatched_restore_panics() {
        StyleAccumulator::new().restore();
    }
}

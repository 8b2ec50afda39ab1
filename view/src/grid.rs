//! The grid controller.
//!
//! `DataGrid` is driven entirely by the host: pointer and keyboard input go
//! in, the change callback and [`GridEvent`]s come out. Every mutation runs
//! synchronously through the matrix's read-only gate; operations split
//! across `navigation`, `keyboard`, `clipboard`, `fill`, `export` and
//! `import` extend this type with further `impl DataGrid` blocks.

use std::cell::Cell;
use std::rc::Rc;

use entrygrid_config::Settings;
use entrygrid_core::{CellPos, Range, Selection};
use entrygrid_engine::events::{ChangeCallback, EventCallback, GridEvent, ValuesChangedEvent};
use entrygrid_engine::{GridConfig, Matrix, RawValues};
use entrygrid_io::ExportSink;

use crate::keyboard::Modifiers;
use crate::state::{CaptureRegistry, Interaction};

/// Everything a host needs to draw one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    /// Displayed value (pending text while the editor is open).
    pub value: String,
    pub read_only: bool,
    pub calculated: bool,
    pub selected: bool,
    pub focused: bool,
    pub editing: bool,
    pub highlighted: bool,
    /// Written by the fill gesture in progress.
    pub filled: bool,
    /// The fill affordance is drawn on the focused editable cell.
    pub fill_handle: bool,
}

pub struct DataGrid {
    pub(crate) matrix: Matrix,
    pub(crate) selection: Selection,
    pub(crate) focus: CellPos,
    /// Origin of shift-extended selections.
    pub(crate) anchor: Option<CellPos>,
    pub(crate) interaction: Interaction,
    pub(crate) captures: CaptureRegistry,
    pub(crate) settings: Settings,
    pub(crate) export_sink: Option<Box<dyn ExportSink>>,
    /// Generation of the newest import; older tickets are stale.
    pub(crate) import_generation: Rc<Cell<u64>>,
    on_change: Option<ChangeCallback>,
    on_event: Option<EventCallback>,
}

impl DataGrid {
    pub fn new(config: GridConfig) -> Self {
        let matrix = Matrix::new(config);
        let focus = first_editable(&matrix);
        Self {
            matrix,
            selection: Selection::new(),
            focus,
            anchor: None,
            interaction: Interaction::Idle,
            captures: CaptureRegistry::new(),
            settings: Settings::default(),
            export_sink: None,
            import_generation: Rc::new(Cell::new(0)),
            on_change: None,
            on_event: None,
        }
    }

    /// Build with user settings; the configured highlight threshold replaces
    /// the one in `config`.
    pub fn with_settings(mut config: GridConfig, settings: Settings) -> Self {
        if let Some(highlight) = config.highlight.as_mut() {
            highlight.threshold_percent = settings.highlight.threshold_percent;
        }
        let mut grid = Self::new(config);
        grid.settings = settings;
        grid
    }

    /// Called with the full raw store after every change.
    pub fn on_change(mut self, callback: impl FnMut(&RawValues) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_event(mut self, callback: impl FnMut(GridEvent) + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    /// Deliver exports here instead of downloading a file.
    pub fn with_export_sink(mut self, sink: impl ExportSink + 'static) -> Self {
        self.export_sink = Some(Box::new(sink));
        self
    }

    // Accessors

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn values(&self) -> &RawValues {
        self.matrix.values()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, pos: CellPos) -> bool {
        self.selection.contains(pos)
    }

    pub fn focus(&self) -> CellPos {
        self.focus
    }

    pub fn anchor(&self) -> Option<CellPos> {
        self.anchor
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Open editor and its pending text.
    pub fn editing(&self) -> Option<(CellPos, &str)> {
        match &self.interaction {
            Interaction::Editing { cell, pending } => Some((*cell, pending.as_str())),
            _ => None,
        }
    }

    pub fn active_captures(&self) -> usize {
        self.captures.active()
    }

    /// Shared handle on the capture count; stays valid after the grid drops.
    pub fn capture_registry(&self) -> CaptureRegistry {
        self.captures.clone()
    }

    pub fn cell_view(&self, pos: CellPos) -> CellView {
        let read_only = self.matrix.is_read_only(pos.row, pos.col);
        let focused = self.focus == pos;
        let pending = match &self.interaction {
            Interaction::Editing { cell, pending } if *cell == pos => Some(pending.clone()),
            _ => None,
        };
        let filled = match &self.interaction {
            Interaction::Filling { filled, .. } => filled.contains(&pos),
            _ => false,
        };
        CellView {
            editing: pending.is_some(),
            value: pending.unwrap_or_else(|| self.matrix.display_value(pos.row, pos.col)),
            read_only,
            calculated: self.matrix.is_calculated_column(pos.col),
            selected: !read_only && self.selection.contains(pos),
            focused: focused && !read_only,
            highlighted: self.matrix.is_highlighted(pos.row, pos.col),
            filled,
            fill_handle: focused && !read_only,
        }
    }

    // Pointer input

    /// Primary-button press on a cell.
    ///
    /// Plain press selects the cell and starts a drag selection; the toggle
    /// modifier adds or removes it; shift with a recorded anchor selects the
    /// rectangle from the anchor. Read-only cells ignore presses.
    pub fn pointer_down(&mut self, cell: CellPos, mods: Modifiers) {
        if self.matrix.is_globally_read_only() || !self.matrix.is_editable(cell) {
            return;
        }

        if mods.shift {
            if let Some(anchor) = self.anchor {
                self.select_range(anchor, cell);
                return;
            }
        }

        // A press inside the open editor belongs to the editor
        if self.interaction.editing_cell() == Some(cell) {
            return;
        }
        self.commit_edit();
        if mods.command() {
            self.selection.toggle(cell);
            self.focus = cell;
            self.anchor = Some(cell);
        } else {
            self.selection.select_only(cell);
            self.focus = cell;
            self.anchor = Some(cell);
            self.interaction = Interaction::RangeSelecting {
                anchor: cell,
                capture: self.captures.acquire(),
            };
        }
    }

    /// The pointer moved onto a cell. `primary_down` is the live button state;
    /// a drag whose button is no longer down is treated as released.
    pub fn pointer_enter(&mut self, cell: CellPos, primary_down: bool) {
        if (self.interaction.is_range_selecting() || self.interaction.is_filling()) && !primary_down {
            self.pointer_up();
            return;
        }
        match &self.interaction {
            Interaction::Filling { .. } => self.fill_into(cell),
            Interaction::RangeSelecting { anchor, .. } => {
                let anchor = *anchor;
                if self.matrix.is_editable(cell) {
                    self.select_range(anchor, cell);
                    self.focus = cell;
                }
            }
            Interaction::Idle | Interaction::Editing { .. } => {}
        }
    }

    /// Primary-button release anywhere. Ends drag gestures and releases
    /// their capture; an open editor is unaffected.
    pub fn pointer_up(&mut self) {
        if self.interaction.is_range_selecting() || self.interaction.is_filling() {
            self.interaction = Interaction::Idle;
        }
    }

    pub fn double_click(&mut self, cell: CellPos) -> bool {
        self.begin_edit(cell)
    }

    /// Abandon every transient state: drag gestures release their capture,
    /// an open editor is discarded and in-flight imports are superseded.
    pub fn teardown(&mut self) {
        self.interaction = Interaction::Idle;
        self.import_generation.set(self.import_generation.get() + 1);
    }

    // Editing

    /// Open the editor on `cell` with its current raw value.
    pub fn begin_edit(&mut self, cell: CellPos) -> bool {
        let current = self.matrix.raw_value(cell.row, cell.col).to_string();
        self.open_editor(cell, current)
    }

    /// Open the editor on `cell` with `text` replacing its value.
    pub fn begin_edit_with(&mut self, cell: CellPos, text: &str) -> bool {
        self.open_editor(cell, text.to_string())
    }

    fn open_editor(&mut self, cell: CellPos, pending: String) -> bool {
        if self.matrix.is_globally_read_only() || !self.matrix.is_editable(cell) {
            return false;
        }
        if self.interaction.editing_cell() == Some(cell) {
            return true;
        }
        self.commit_edit();
        self.focus = cell;
        self.interaction = Interaction::Editing { cell, pending };
        true
    }

    /// Replace the pending text of the open editor.
    pub fn edit_text(&mut self, text: &str) -> bool {
        match &mut self.interaction {
            Interaction::Editing { pending, .. } => {
                pending.clear();
                pending.push_str(text);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn edit_push(&mut self, ch: char) {
        if let Interaction::Editing { pending, .. } = &mut self.interaction {
            pending.push(ch);
        }
    }

    pub(crate) fn edit_pop(&mut self) {
        if let Interaction::Editing { pending, .. } = &mut self.interaction {
            pending.pop();
        }
    }

    /// Write the pending text and close the editor. An empty text removes
    /// the stored value. Returns false when no editor was open.
    pub fn commit_edit(&mut self) -> bool {
        if !self.interaction.is_editing() {
            return false;
        }
        let Interaction::Editing { cell, pending } = std::mem::take(&mut self.interaction) else {
            return false;
        };
        let value = (!pending.is_empty()).then_some(pending);
        self.apply_writes([(cell, value)]);
        true
    }

    /// Close the editor without writing. Returns false when none was open.
    pub fn cancel_edit(&mut self) -> bool {
        if !self.interaction.is_editing() {
            return false;
        }
        self.interaction = Interaction::Idle;
        true
    }

    // Selection

    pub fn select_all(&mut self) {
        self.selection.replace(self.matrix.editable_cells());
    }

    /// Remove the values of every selected editable cell.
    pub fn clear_selected(&mut self) -> usize {
        let cells: Vec<CellPos> = self.selection.iter().collect();
        self.apply_writes(cells.into_iter().map(|pos| (pos, None)))
    }

    /// Rectangle between two corners, read-only cells excluded.
    pub(crate) fn select_range(&mut self, a: CellPos, b: CellPos) {
        let matrix = &self.matrix;
        self.selection
            .replace(Range::between(a, b).cells().filter(|pos| matrix.is_editable(*pos)));
    }

    /// Drop selection, anchor and any gesture; focus returns to the first
    /// editable cell.
    pub(crate) fn reset_interaction(&mut self) {
        self.interaction = Interaction::Idle;
        self.selection.clear();
        self.anchor = None;
        self.focus = first_editable(&self.matrix);
    }

    // Mutation and notification

    /// Apply writes (`None` removes) through the read-only gate and notify
    /// once if anything changed. Returns the number of cells changed.
    pub(crate) fn apply_writes<I>(&mut self, writes: I) -> usize
    where
        I: IntoIterator<Item = (CellPos, Option<String>)>,
    {
        let mut changed = Vec::new();
        for (pos, value) in writes {
            let did_change = match value {
                Some(value) => self.matrix.set_value(pos.row, pos.col, &value),
                None => self.matrix.remove_value(pos.row, pos.col),
            };
            if did_change {
                changed.push(pos);
            }
        }
        if changed.is_empty() {
            return 0;
        }
        changed.sort();
        changed.dedup();
        let count = changed.len();
        self.emit(GridEvent::ValuesChanged(ValuesChangedEvent {
            revision: self.matrix.revision(),
            cells: changed,
        }));
        self.notify_change();
        count
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        log::trace!("grid event: {:?}", event);
        if let Some(callback) = self.on_event.as_mut() {
            callback(event);
        }
    }

    pub(crate) fn notify_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.matrix.values());
        }
    }
}

/// First editable cell in row-major order, else the origin.
fn first_editable(matrix: &Matrix) -> CellPos {
    let (rows, cols) = matrix.dimensions();
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| CellPos::new(r, c)))
        .find(|pos| matrix.is_editable(*pos))
        .unwrap_or(CellPos::new(0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrygrid_engine::layout::{ColumnGroup, RowGroup};
    use std::cell::RefCell;

    fn grouped() -> DataGrid {
        DataGrid::new(GridConfig::grouped(
            vec![RowGroup::new("Grup1", ["Prod 1.1", "Prod 1.2"])],
            vec![ColumnGroup::new("March", ["Vol.", "Price"])],
        ))
    }

    #[test]
    fn test_initial_focus_skips_headers() {
        let grid = grouped();
        assert_eq!(grid.focus(), CellPos::new(1, 0));

        let ro = DataGrid::new(GridConfig::flat(2, 2).read_only(true));
        assert_eq!(ro.focus(), CellPos::new(0, 0));
    }

    #[test]
    fn test_click_selects_and_starts_drag() {
        let mut grid = DataGrid::new(GridConfig::flat(4, 4));
        grid.pointer_down(CellPos::new(1, 1), Modifiers::NONE);
        assert!(grid.is_selected(CellPos::new(1, 1)));
        assert_eq!(grid.focus(), CellPos::new(1, 1));
        assert!(grid.interaction().is_range_selecting());
        assert_eq!(grid.active_captures(), 1);

        grid.pointer_enter(CellPos::new(2, 3), true);
        assert_eq!(grid.selection().len(), 6);
        assert_eq!(grid.focus(), CellPos::new(2, 3));

        grid.pointer_up();
        assert!(grid.interaction().is_idle());
        assert_eq!(grid.active_captures(), 0);
    }

    #[test]
    fn test_drag_without_button_ends_gesture() {
        let mut grid = DataGrid::new(GridConfig::flat(4, 4));
        grid.pointer_down(CellPos::new(0, 0), Modifiers::NONE);
        grid.pointer_enter(CellPos::new(3, 3), false);
        assert_eq!(grid.selection().len(), 1);
        assert_eq!(grid.active_captures(), 0);
    }

    #[test]
    fn test_toggle_and_shift_click() {
        let mut grid = DataGrid::new(GridConfig::flat(4, 4));
        grid.pointer_down(CellPos::new(0, 0), Modifiers::NONE);
        grid.pointer_up();
        grid.pointer_down(CellPos::new(3, 3), Modifiers::CTRL);
        assert_eq!(grid.selection().len(), 2);
        assert_eq!(grid.focus(), CellPos::new(3, 3));
        assert!(grid.interaction().is_idle());

        grid.pointer_down(CellPos::new(3, 3), Modifiers::CTRL);
        assert_eq!(grid.selection().len(), 1);

        // Anchor is now (3,3); shift-click selects the rectangle, focus stays
        grid.pointer_down(CellPos::new(2, 1), Modifiers::SHIFT);
        assert_eq!(grid.selection().len(), 6);
        assert_eq!(grid.focus(), CellPos::new(3, 3));
    }

    #[test]
    fn test_read_only_cells_ignore_clicks() {
        let mut grid = grouped();
        grid.pointer_down(CellPos::new(0, 0), Modifiers::NONE);
        assert!(grid.selection().is_empty());
        assert_eq!(grid.active_captures(), 0);
    }

    #[test]
    fn test_drag_rectangle_excludes_read_only() {
        let mut grid = grouped();
        grid.pointer_down(CellPos::new(1, 0), Modifiers::NONE);
        grid.pointer_enter(CellPos::new(2, 1), true);
        assert_eq!(grid.selection().len(), 4);
        grid.pointer_up();

        // Entering a header row leaves selection and focus alone
        grid.pointer_down(CellPos::new(2, 1), Modifiers::NONE);
        grid.pointer_enter(CellPos::new(0, 0), true);
        assert_eq!(grid.selection().len(), 1);
        assert_eq!(grid.focus(), CellPos::new(2, 1));
    }

    #[test]
    fn test_edit_commit_and_cancel() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut grid = DataGrid::new(GridConfig::flat(3, 3)).on_change(move |v| sink.borrow_mut().push(v.len()));

        assert!(grid.begin_edit(CellPos::new(0, 0)));
        grid.edit_text("12");
        assert_eq!(grid.editing(), Some((CellPos::new(0, 0), "12")));
        assert_eq!(grid.cell_view(CellPos::new(0, 0)).value, "12");
        assert!(grid.commit_edit());
        assert_eq!(grid.matrix().raw_value(0, 0), "12");

        grid.begin_edit(CellPos::new(0, 0));
        grid.edit_text("99");
        assert!(grid.cancel_edit());
        assert_eq!(grid.matrix().raw_value(0, 0), "12");

        // Empty commit removes the value
        grid.begin_edit_with(CellPos::new(0, 0), "");
        grid.commit_edit();
        assert!(grid.values().is_empty());

        assert_eq!(*log.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_click_elsewhere_commits_edit() {
        let mut grid = DataGrid::new(GridConfig::flat(3, 3));
        grid.begin_edit_with(CellPos::new(0, 0), "7");
        grid.pointer_down(CellPos::new(1, 1), Modifiers::NONE);
        assert_eq!(grid.matrix().raw_value(0, 0), "7");
        assert!(grid.interaction().is_range_selecting());
    }

    #[test]
    fn test_press_inside_editor_keeps_editing() {
        let mut grid = DataGrid::new(GridConfig::flat(3, 3));
        grid.begin_edit_with(CellPos::new(1, 1), "4");
        grid.pointer_down(CellPos::new(1, 1), Modifiers::NONE);
        assert_eq!(grid.editing(), Some((CellPos::new(1, 1), "4")));
        assert_eq!(grid.active_captures(), 0);
    }

    #[test]
    fn test_clear_selected_respects_gate() {
        let initial: RawValues = [((0, 0), "1"), ((0, 1), "2"), ((1, 0), "3")].into_iter().collect();
        let mut grid = DataGrid::new(GridConfig::flat(2, 2).with_initial_values(initial));
        grid.select_all();
        assert_eq!(grid.selection().len(), 4);
        assert_eq!(grid.clear_selected(), 3);
        assert!(grid.values().is_empty());
    }

    #[test]
    fn test_teardown_releases_capture() {
        let mut grid = DataGrid::new(GridConfig::flat(2, 2));
        let registry = grid.capture_registry();
        grid.pointer_down(CellPos::new(0, 0), Modifiers::NONE);
        assert_eq!(registry.active(), 1);
        grid.teardown();
        assert_eq!(registry.active(), 0);

        grid.pointer_down(CellPos::new(0, 1), Modifiers::NONE);
        assert_eq!(registry.active(), 1);
        drop(grid);
        assert_eq!(registry.active(), 0);
    }
}

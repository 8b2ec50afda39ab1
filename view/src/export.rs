//! Export and clear.

use entrygrid_engine::events::GridEvent;
use entrygrid_io::csv;
use entrygrid_io::{Download, ExportError, ExportSink};

use crate::grid::DataGrid;

impl DataGrid {
    /// The whole matrix as CSV text (labels and displayed values).
    pub fn export_csv(&self) -> Result<String, ExportError> {
        csv::serialize(&self.matrix)
    }

    /// Serialize and deliver: to the sink given at construction, or as a
    /// download file named by the export settings. An open editor is
    /// committed first so the export matches what is on screen.
    pub fn export(&mut self) -> Result<(), ExportError> {
        self.commit_edit();
        let text = self.export_csv()?;
        match self.export_sink.as_mut() {
            Some(sink) => sink.deliver(&text)?,
            None => Download::from_settings(&self.settings.export).deliver(&text)?,
        }
        log::info!("exported {} row(s)", self.matrix.row_count());
        Ok(())
    }

    /// Export, then clear. Nothing is cleared when the export fails.
    pub fn export_and_clear(&mut self) -> Result<(), ExportError> {
        self.export()?;
        self.clear();
        Ok(())
    }

    /// Wipe all values, the selection and any gesture; focus returns to the
    /// first editable cell. Always notifies.
    pub fn clear(&mut self) {
        self.matrix.clear();
        self.reset_interaction();
        self.emit(GridEvent::Cleared {
            revision: self.matrix.revision(),
        });
        self.notify_change();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Modifiers;
    use entrygrid_config::Settings;
    use entrygrid_core::CellPos;
    use entrygrid_engine::events::EventCollector;
    use entrygrid_engine::{GridConfig, RawValues};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    fn seeded() -> RawValues {
        [((0, 0), "1"), ((1, 1), "a,b")].into_iter().collect()
    }

    #[test]
    fn test_sink_receives_text() {
        let out = Rc::new(RefCell::new(String::new()));
        let target = Rc::clone(&out);
        let mut g = DataGrid::new(GridConfig::flat(2, 2).with_initial_values(seeded()))
            .with_export_sink(move |text: &str| target.borrow_mut().push_str(text));

        g.export().unwrap();
        assert_eq!(*out.borrow(), ",A,B\n1,1,\n2,,\"a,b\"\n");
        assert_eq!(g.values().len(), 2, "plain export keeps data");
    }

    #[test]
    fn test_export_and_clear_resets_state() {
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let collector = Rc::clone(&events);
        let notified = Rc::new(RefCell::new(Vec::new()));
        let notify_log = Rc::clone(&notified);

        let mut g = DataGrid::new(GridConfig::flat(3, 3).with_initial_values(seeded()))
            .with_export_sink(|_: &str| {})
            .on_event(move |e| collector.borrow_mut().push(e))
            .on_change(move |v| notify_log.borrow_mut().push(v.len()));

        g.pointer_down(CellPos::new(2, 2), Modifiers::NONE);
        g.pointer_up();
        g.export_and_clear().unwrap();

        assert!(g.values().is_empty());
        assert!(g.selection().is_empty());
        assert_eq!(g.focus(), CellPos::new(0, 0));
        assert_eq!(g.anchor(), None);
        assert_eq!(*notified.borrow(), vec![0]);
        assert!(matches!(events.borrow().events(), [GridEvent::Cleared { .. }]));
    }

    #[test]
    fn test_failed_export_does_not_clear() {
        struct Refuse;
        impl ExportSink for Refuse {
            fn deliver(&mut self, _: &str) -> Result<(), ExportError> {
                Err(ExportError::Sink("offline".into()))
            }
        }

        let mut g = DataGrid::new(GridConfig::flat(2, 2).with_initial_values(seeded())).with_export_sink(Refuse);
        assert!(g.export_and_clear().is_err());
        assert_eq!(g.values().len(), 2);
    }

    #[test]
    fn test_default_export_downloads_file() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.export.directory = Some(dir.path().to_path_buf());

        let mut g = DataGrid::with_settings(GridConfig::flat(1, 1), settings);
        g.begin_edit_with(CellPos::new(0, 0), "5");
        g.export().unwrap();
        g.export().unwrap();

        let first = std::fs::read_to_string(dir.path().join("export.csv")).unwrap();
        assert_eq!(first, ",A\n1,5\n");
        assert!(dir.path().join("export (1).csv").exists());
    }

    #[test]
    fn test_clear_without_export() {
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let mut g = DataGrid::new(GridConfig::flat(2, 2).with_initial_values(seeded()))
            .on_change(move |_| *counter.borrow_mut() += 1);
        g.clear();
        g.clear();
        assert!(g.values().is_empty());
        assert_eq!(*count.borrow(), 2);
    }
}

use std::path::Path;

use log::{debug, error, info, warn};

use crate::config::ViewerConfig;
use crate::data::filter::filter;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::record::{self, expected_columns, StudentDisplayRecord};
use crate::error::{Result, ViewerError};
use crate::selection::{SelectionController, SelectionPolicy};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// Every user event goes through one method here, which applies all of its
/// changes (dataset, search term, selection) before returning.
#[derive(Debug, Default)]
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded dataset (None until a file loads successfully).
    dataset: Option<Dataset>,

    /// Active search term as typed.
    search_term: String,

    /// Current filtered view and selected student.
    selection: SelectionController,

    /// Expected columns the loaded table lacks.
    pub missing_columns: Vec<&'static str>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

/// What the front end should show after an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// No file loaded yet, or the last load failed.
    NoDataset,
    /// The search matched nothing.
    NoResults { total: usize },
    /// One student's profile.
    Student {
        record: Box<StudentDisplayRecord>,
        /// Offset of the student within the filtered view.
        index: usize,
        matches: usize,
        total: usize,
    },
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Load `path`, replacing the current dataset. On failure the viewer
    /// returns to the "nothing loaded" state.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        match load_file(path) {
            Ok(dataset) => {
                info!(
                    "Loaded {} students with {} columns from {}",
                    dataset.len(),
                    dataset.column_names().len(),
                    path.display()
                );
                if dataset.is_empty() {
                    warn!("{} has a header but no students", path.display());
                }
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load file: {e:#}");
                let err = ViewerError::Load {
                    path: path.display().to_string(),
                    reason: format!("{e:#}"),
                };
                self.clear_dataset();
                self.status_message = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Ingest a newly loaded dataset and rebuild the view for the current term.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.missing_columns = dataset.missing_columns(&expected_columns());
        if !self.missing_columns.is_empty() {
            warn!("Table lacks expected columns: {:?}", self.missing_columns);
        }

        // Row identities from the previous table mean nothing here.
        self.selection = SelectionController::default();
        self.selection
            .on_new_view(filter(&dataset, &self.search_term), SelectionPolicy::ResetToFirst);

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Drop the dataset and everything derived from it.
    pub fn clear_dataset(&mut self) {
        self.dataset = None;
        self.selection = SelectionController::default();
        self.missing_columns.clear();
    }

    /// Update the search term and recompute the filtered view.
    pub fn set_search_term(&mut self, term: &str) {
        if term == self.search_term {
            return;
        }
        self.search_term = term.to_string();
        self.refilter();
    }

    /// Recompute the filtered view after a search change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let view = filter(ds, &self.search_term);
            debug!("search '{}' matched {} rows", self.search_term, view.len());
            self.selection.on_new_view(view, self.config.selection_policy);
        }
    }

    pub fn prev(&mut self) {
        self.selection.prev();
    }

    pub fn next(&mut self) {
        self.selection.next();
    }

    /// Pick the student at `index` of the filtered view.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.selection.select(index)
    }

    /// Total number of loaded students.
    pub fn total(&self) -> usize {
        self.dataset.as_ref().map_or(0, Dataset::len)
    }

    /// Number of students matching the search.
    pub fn matches(&self) -> usize {
        self.selection.view().len()
    }

    /// Picker entry (name, ID, class) for the student at `position` of the
    /// filtered view.
    pub fn picker_row(&self, position: usize) -> Option<[String; 3]> {
        let ds = self.dataset.as_ref()?;
        let row = ds.row(*self.selection.view().indices.get(position)?)?;
        Some(record::picker_fields(row))
    }

    /// Build what the front end should display right now.
    ///
    /// The student record is rebuilt on every call.
    pub fn view(&self) -> Result<View> {
        let Some(ds) = &self.dataset else {
            return Ok(View::NoDataset);
        };
        let (Some(index), Some(row)) = (
            self.selection.index(),
            self.selection.current_row().and_then(|i| ds.row(i)),
        ) else {
            return Ok(View::NoResults { total: ds.len() });
        };
        Ok(View::Student {
            record: Box::new(record::build(row)?),
            index,
            matches: self.matches(),
            total: ds.len(),
        })
    }
}

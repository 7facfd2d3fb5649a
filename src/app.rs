use crate::catalog::{self, Catalog, CatalogSource, GameRecord, LoadError};
use crate::contact::ContactForm;
use crate::pipeline::{self, FilterQuery, SortKey};
use crate::view::{CardView, DetailView, GridView, NO_RESULTS_NOTICE};
use std::ops::Range;
use std::time::Instant;

/// Cards per grid row.
pub const GRID_COLUMNS: usize = 3;

/// Which view is currently active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Grid,
    Detail,
    Contact,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// The select-type filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterControl {
    Genre,
    Platform,
    Year,
    Sort,
}

/// A select control: its options and the chosen one. No selection means "Any".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    options: Vec<T>,
    selected: Option<usize>,
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
        }
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn new(options: Vec<T>) -> Self {
        Self {
            options,
            selected: None,
        }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Select `value` if it is one of the options.
    pub fn select(&mut self, value: &T) -> bool {
        match self.options.iter().position(|o| o == value) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Any → first → ... → last → Any.
    pub fn next(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
    }

    pub fn prev(&mut self) {
        self.selected = match self.selected {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    pub catalog: Catalog,
    pub load_error: Option<LoadError>,

    // Filter controls
    pub query: String,
    pub input_mode: InputMode,
    pub genre: Choice<String>,
    pub platform: Choice<String>,
    pub year: Choice<i32>,
    pub sort: Choice<SortKey>,

    // Derived view
    pub filtered: Vec<usize>, // Indices into the catalog, in display order
    pub page: usize,          // 1-based
    pub selected: usize,      // Card index within the current page

    pub detail: Option<DetailView>,
    pub contact: ContactForm,

    // Status message
    pub status_msg: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            view: View::Grid,
            show_help: false,

            catalog: Catalog::default(),
            load_error: None,

            query: String::new(),
            input_mode: InputMode::Normal,
            genre: Choice::default(),
            platform: Choice::default(),
            year: Choice::default(),
            sort: Choice::new(SortKey::ALL.to_vec()),

            filtered: Vec::new(),
            page: 1,
            selected: 0,

            detail: None,
            contact: ContactForm::default(),

            status_msg: "Loading catalog...".to_string(),
        }
    }

    /// Initial data load. Failure is kept in the app state, never returned.
    pub async fn load(&mut self, source: &CatalogSource) {
        log::info!("Loading catalog from {}", source);
        match catalog::load(source).await {
            Ok(catalog) => self.install_catalog(catalog),
            Err(e) => {
                log::error!("Catalog load from {} failed: {}", source, e);
                self.fail_load(e);
            }
        }
    }

    /// Populate the selectors and show the catalog in its own order.
    pub fn install_catalog(&mut self, catalog: Catalog) {
        let options = catalog.filter_options();
        self.genre = Choice::new(options.genres);
        self.platform = Choice::new(options.platforms);
        self.year = Choice::new(options.years);

        self.filtered = (0..catalog.len()).collect();
        self.catalog = catalog;
        self.page = 1;
        self.selected = 0;
        self.load_error = None;

        if self.catalog.is_empty() {
            log::warn!("Catalog is empty");
        }
        log::info!("{} games loaded", self.catalog.len());
        self.status_msg = format!("{} games loaded", self.catalog.len());
    }

    pub fn fail_load(&mut self, error: LoadError) {
        self.catalog = Catalog::default();
        self.filtered.clear();
        self.genre = Choice::default();
        self.platform = Choice::default();
        self.year = Choice::default();
        self.page = 1;
        self.selected = 0;
        self.load_error = Some(error);
        self.status_msg.clear();
    }

    /// Current selector state as pipeline predicates.
    pub fn filter_query(&self) -> FilterQuery {
        FilterQuery {
            text: self.query.clone(),
            genre: self.genre.selected().cloned(),
            platform: self.platform.selected().cloned(),
            year: self.year.selected().copied(),
        }
    }

    /// Recompute the filtered and sorted view and go back to page 1.
    pub fn apply_filters(&mut self) {
        let query = self.filter_query();
        let sort = self.sort.selected().copied();
        self.filtered = pipeline::run(self.catalog.records(), &query, sort);
        self.page = 1;
        self.selected = 0;

        log::debug!("Filters {:?} sort {:?}: {} matches", query, sort, self.filtered.len());
        self.status_msg = format!(
            "{} games found for \"{}\"",
            self.filtered.len(),
            if self.query.trim().is_empty() { "all" } else { self.query.trim() }
        );
    }

    /// Clear query and selectors, sort by title ascending, recompute.
    pub fn reset_filters(&mut self) {
        self.query.clear();
        self.genre.clear();
        self.platform.clear();
        self.year.clear();
        self.sort.select(&SortKey::TitleAsc);
        self.apply_filters();
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.sort.select(&key);
        self.apply_filters();
    }

    /// Step one selector forward or back, then recompute.
    pub fn cycle_filter(&mut self, control: FilterControl, forward: bool) {
        match control {
            FilterControl::Genre => step(&mut self.genre, forward),
            FilterControl::Platform => step(&mut self.platform, forward),
            FilterControl::Year => step(&mut self.year, forward),
            FilterControl::Sort => step(&mut self.sort, forward),
        }
        self.apply_filters();
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.apply_filters();
    }

    pub fn pop_query(&mut self) {
        if self.query.pop().is_some() {
            self.apply_filters();
        }
    }

    // ── Pagination ──

    pub fn total_pages(&self) -> usize {
        pipeline::total_pages(self.filtered.len())
    }

    /// Positions in `filtered` shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        pipeline::page_range(self.filtered.len(), self.page)
    }

    pub fn page_records(&self) -> Vec<&GameRecord> {
        self.filtered[self.page_range()]
            .iter()
            .filter_map(|&i| self.catalog.get(i))
            .collect()
    }

    /// Show another page. Filters and ordering are left untouched.
    /// Pages outside `1..=total_pages` are ignored.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() || page == self.page {
            return false;
        }
        self.page = page;
        self.selected = 0;
        log::debug!("Page {} of {}", page, self.total_pages());
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    // ── Card cursor ──

    fn cards_on_page(&self) -> usize {
        self.page_range().len()
    }

    pub fn select_right(&mut self) {
        if self.selected + 1 < self.cards_on_page() {
            self.selected += 1;
        }
    }

    pub fn select_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + GRID_COLUMNS < self.cards_on_page() {
            self.selected += GRID_COLUMNS;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected >= GRID_COLUMNS {
            self.selected -= GRID_COLUMNS;
        }
    }

    // ── Detail overlay ──

    /// Open the detail overlay for the selected card.
    pub fn open_detail(&mut self) {
        self.open_detail_at(self.selected);
    }

    /// Open the detail overlay for card `slot` of the current page.
    pub fn open_detail_at(&mut self, slot: usize) {
        let record = self.page_records().get(slot).map(|r| DetailView::from_record(r));
        if let Some(detail) = record {
            self.selected = slot;
            self.detail = Some(detail);
            self.view = View::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.view = View::Grid;
    }

    // ── Contact form ──

    pub fn open_contact(&mut self) {
        self.view = View::Contact;
    }

    pub fn close_contact(&mut self) {
        self.view = View::Grid;
    }

    pub fn submit_contact(&mut self, now: Instant) {
        self.contact.submit(now);
        log::info!("Contact form acknowledged");
    }

    /// Expire timed notices.
    pub fn tick(&mut self, now: Instant) {
        if self.contact.tick(now) {
            log::debug!("Contact acknowledgment hidden");
        }
    }

    /// What the card area should show right now.
    pub fn grid_view(&self) -> GridView {
        if let Some(error) = &self.load_error {
            return GridView::LoadFailed {
                notice: error.user_message().to_string(),
            };
        }
        if self.filtered.is_empty() {
            return GridView::Empty {
                notice: NO_RESULTS_NOTICE.to_string(),
            };
        }
        GridView::Page {
            cards: self
                .page_records()
                .into_iter()
                .map(CardView::from_record)
                .collect(),
            page: self.page,
            total_pages: self.total_pages(),
            selected: self.selected,
        }
    }
}

fn step<T: PartialEq>(choice: &mut Choice<T>, forward: bool) {
    if forward {
        choice.next();
    } else {
        choice.prev();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

mod app;
mod catalog;
mod config;
mod contact;
mod pipeline;
mod ui;
mod view;

use app::{App, FilterControl, InputMode, View};
use clap::Parser;
use config::Config;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::LevelFilter;
use ratatui::layout::{Position, Rect};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Browse a catalog of games: search, filter, sort and page through it
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path or http(s) URL of the catalog JSON
    #[arg(short, long)]
    catalog: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial sort: title_asc, title_desc, year_desc or year_asc
    #[arg(short, long)]
    sort: Option<String>,

    /// Log file (defaults to the platform cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::default_path);
    let config = match config_path.as_deref() {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Warning: {e}; using defaults");
            Config::default()
        }),
        None => Config::default(),
    };

    if let Some(log_path) = config.log_path(cli.log_file.clone()) {
        init_logging(&log_path, cli.verbose);
    }
    if let Some(path) = &config_path {
        log::info!("Using config {}", path.display());
    }

    // Load once; a failure is shown in the grid, not returned
    let source = config.catalog_source(cli.catalog.as_deref());
    let mut app = App::new();
    app.load(&source).await;

    if app.load_error.is_none() {
        if let Some(key) = config.sort_key(cli.sort.as_deref()) {
            app.set_sort(key);
        }
    }

    // Init terminal
    let mut terminal = ratatui::init();

    let result: Result<(), Box<dyn std::error::Error>> =
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)
            .map_err(Into::into)
            .and_then(|()| run_app(&mut terminal, &mut app));

    // Restore terminal
    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = result {
        log::error!("Fatal: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Send `log` output to a file; the terminal belongs to the UI.
fn init_logging(path: &Path, verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: cannot create log directory {}: {e}", parent.display());
            return;
        }
    }
    match std::fs::File::create(path) {
        Ok(file) => {
            if let Err(e) = simplelog::WriteLogger::init(level, simplelog::Config::default(), file) {
                eprintln!("Warning: logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("Warning: cannot open log file {}: {e}", path.display()),
    }
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(app, mouse, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?')
        && app.input_mode == InputMode::Normal
        && app.view != View::Contact
    {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }
    match app.view {
        View::Grid => handle_grid_key(app, key),
        View::Detail => handle_detail_key(app, key),
        View::Contact => handle_contact_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.pop_query(),
        KeyCode::Char(c) => app.push_query(c),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Right | KeyCode::Char('l') => app.select_right(),
        KeyCode::Left | KeyCode::Char('h') => app.select_left(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char(']') | KeyCode::PageDown => {
            app.next_page();
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            app.prev_page();
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(page) = c.to_digit(10) {
                app.set_page(page as usize);
            }
        }
        KeyCode::Char('g') => app.cycle_filter(FilterControl::Genre, true),
        KeyCode::Char('G') => app.cycle_filter(FilterControl::Genre, false),
        KeyCode::Char('p') => app.cycle_filter(FilterControl::Platform, true),
        KeyCode::Char('P') => app.cycle_filter(FilterControl::Platform, false),
        KeyCode::Char('y') => app.cycle_filter(FilterControl::Year, true),
        KeyCode::Char('Y') => app.cycle_filter(FilterControl::Year, false),
        KeyCode::Char('o') => app.cycle_filter(FilterControl::Sort, true),
        KeyCode::Char('O') => app.cycle_filter(FilterControl::Sort, false),
        KeyCode::Char('r') => {
            app.reset_filters();
            app.status_msg = "Filters reset".to_string();
        }
        KeyCode::Char('c') => app.open_contact(),
        KeyCode::Esc => {
            // Clear search
            if !app.query.is_empty() {
                app.query.clear();
                app.apply_filters();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        app.close_detail();
    }
}

fn handle_contact_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_contact(),
        KeyCode::Tab | KeyCode::Down => {
            app.contact.focus = app.contact.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.contact.focus = app.contact.focus.prev();
        }
        KeyCode::Enter => app.submit_contact(Instant::now()),
        KeyCode::Backspace => app.contact.pop(),
        KeyCode::Char(c) => app.contact.push(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, area: Rect) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if app.show_help {
        app.show_help = false;
        return;
    }
    let pos = Position::new(mouse.column, mouse.row);

    match app.view {
        View::Detail => {
            let overlay = ui::detail::overlay_area(area);
            if !overlay.contains(pos) || ui::detail::close_button(overlay).contains(pos) {
                app.close_detail();
            }
        }
        View::Contact => {
            if !ui::contact::overlay_area(area).contains(pos) {
                app.close_contact();
            }
        }
        View::Grid => {
            let regions = ui::grid::regions(area, app.total_pages());
            if let Some(page) = ui::grid::page_at(regions.pagination, app.total_pages(), pos) {
                app.set_page(page);
            } else if let Some(slot) = ui::grid::card_rects(regions.cards)
                .iter()
                .position(|rect| rect.contains(pos))
            {
                app.open_detail_at(slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_catalog;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(app: &mut App, area: Rect, x: u16, y: u16) {
        handle_mouse(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row: y,
                modifiers: KeyModifiers::NONE,
            },
            area,
        );
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        app.install_catalog(sample_catalog());
        app
    }

    #[test]
    fn test_search_typing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Editing);
        for c in "Zel".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.query, "Zel");
        assert_eq!(app.filtered.len(), 2);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Esc);
        assert!(app.query.is_empty());
        assert_eq!(app.filtered.len(), 14);
    }

    #[test]
    fn test_page_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.page, 3);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.page, 3);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.page, 2);
    }

    #[test]
    fn test_reset_key() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('g'));
        assert!(app.genre.selected().is_some());
        press(&mut app, KeyCode::Char('r'));
        assert!(app.genre.selected().is_none());
        assert_eq!(app.status_msg, "Filters reset");
    }

    #[test]
    fn test_contact_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.view, View::Contact);
        // 'q' and '?' are text here
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.contact.name, "q?");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Enter);
        assert!(app.contact.name.is_empty());
        assert!(app.contact.ack_visible());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Grid);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = loaded_app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_click_card_then_outside() {
        let area = Rect::new(0, 0, 120, 40);
        let mut app = loaded_app();
        let regions = ui::grid::regions(area, app.total_pages());
        let second = ui::grid::card_rects(regions.cards)[1];

        click(&mut app, area, second.x + 2, second.y + 2);
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.detail.as_ref().unwrap().title, "Persona 5");

        // inside the overlay keeps it open
        let overlay = ui::detail::overlay_area(area);
        click(&mut app, area, overlay.x + 2, overlay.y + 2);
        assert_eq!(app.view, View::Detail);

        click(&mut app, area, 0, 0);
        assert_eq!(app.view, View::Grid);
    }

    #[test]
    fn test_click_close_control() {
        let area = Rect::new(0, 0, 120, 40);
        let mut app = loaded_app();
        app.open_detail();
        let close = ui::detail::close_button(ui::detail::overlay_area(area));
        click(&mut app, area, close.x + 1, close.y);
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_click_page_button() {
        let area = Rect::new(0, 0, 120, 40);
        let mut app = loaded_app();
        let regions = ui::grid::regions(area, app.total_pages());
        let (_, third) = ui::grid::page_button_rects(regions.pagination, app.total_pages())[2];
        click(&mut app, area, third.x, third.y);
        assert_eq!(app.page, 3);
        assert_eq!(app.view, View::Grid);
    }
}

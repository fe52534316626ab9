//! Application state and event loop

use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event, KeyCode,
    KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
    DefaultTerminal, Frame,
};

use crate::calendar::{
    build_month_layout, DragSelector, MonthKey, PointerId, ScrollMetrics, ScrollWindow, MAX_VISIBLE_LIMIT,
};
use crate::services::{Agenda, Config, DirectoryWatcher, EventLoaderService, LoadedEvents, RefreshSignal, PAGE_SIZE};
use crate::types::{CalendarEvent, DateRange, LoadWarning};

use super::theme::Theme;
use super::widgets::{
    agenda::{self, AgendaView},
    day_list::DayListSheet,
    event_detail::EventDetailPopup,
    help::HelpPopup,
    month_view::{hit_test, GridMetrics, Hit, MonthView},
    new_event::NewEventPopup,
    spinner::{LoadingStage, Spinner},
    tabs::{Tab, TabBar},
};

/// The terminal has one pointer
const MOUSE_POINTER: PointerId = 0;
/// Rows moved per wheel notch
const WHEEL_STEP: usize = 3;
/// Upper bound on window extensions per viewport update
const MAX_SYNC_ROUNDS: usize = 24;

/// Host hooks for the two user intents the calendar produces
pub trait CalendarCallbacks {
    /// A drag (or day-list "new event") committed a date range
    fn on_range_select(&mut self, range: DateRange);
    /// An event was clicked or opened from the day list
    fn on_event_activate(&mut self, event: &CalendarEvent);
}

/// Default hooks: record the intent in the log
pub struct LogCallbacks;

impl CalendarCallbacks for LogCallbacks {
    fn on_range_select(&mut self, range: DateRange) {
        log::info!(
            "event=range_select start={} end={} days={}",
            range.start,
            range.end,
            range.days()
        );
    }

    fn on_event_activate(&mut self, event: &CalendarEvent) {
        log::info!("event=event_activate id={} title={:?}", event.id, event.title);
    }
}

/// Application state
pub enum AppState {
    Loading {
        spinner_frame: usize,
        stage: LoadingStage,
    },
    Ready,
    Error {
        message: String,
    },
}

/// Popup or sheet drawn over the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    DayList { date: NaiveDate, selected: usize },
    EventDetail { id: String },
    NewEvent { range: DateRange },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    current_tab: Tab,
    theme: Theme,
    today: NaiveDate,
    events: Vec<CalendarEvent>,
    warnings: Vec<LoadWarning>,
    reloading: Option<RefreshSignal>,
    events_dir: Option<PathBuf>,
    refresh_requested: bool,
    window: ScrollWindow,
    scroll: usize,
    positioned: bool,
    drag: DragSelector,
    overlay: Overlay,
    agenda_shown: usize,
    agenda_scroll: usize,
    budget: usize,
    compact_width: u16,
    compact_override: Option<bool>,
    viewport: Rect,
    callbacks: Box<dyn CalendarCallbacks>,
}

impl App {
    /// Create a new app in loading state
    pub fn new(config: &Config, today: NaiveDate, theme: Theme) -> Self {
        Self {
            state: AppState::Loading {
                spinner_frame: 0,
                stage: LoadingStage::Loading,
            },
            should_quit: false,
            current_tab: Tab::default(),
            theme,
            today,
            events: Vec::new(),
            warnings: Vec::new(),
            reloading: None,
            events_dir: None,
            refresh_requested: false,
            window: ScrollWindow::new(config.window_config(), today),
            scroll: 0,
            positioned: false,
            drag: DragSelector::new(),
            overlay: Overlay::None,
            agenda_shown: PAGE_SIZE,
            agenda_scroll: 0,
            budget: config.max_visible_events.min(MAX_VISIBLE_LIMIT),
            compact_width: config.compact_width,
            compact_override: None,
            viewport: Rect::default(),
            callbacks: Box::new(LogCallbacks),
        }
    }

    pub fn with_callbacks(mut self, callbacks: Box<dyn CalendarCallbacks>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Directory named on the loading screen
    pub fn with_events_dir(mut self, dir: PathBuf) -> Self {
        self.events_dir = Some(dir);
        self
    }

    /// Force the compact (or wide) layout regardless of terminal width
    pub fn with_compact(mut self, compact: Option<bool>) -> Self {
        self.compact_override = compact;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn months(&self) -> &[MonthKey] {
        self.window.months()
    }

    pub fn compact(&self) -> bool {
        self.compact_override
            .unwrap_or(self.viewport.width > 0 && self.viewport.width < self.compact_width)
    }

    fn metrics(&self) -> GridMetrics {
        GridMetrics {
            compact: self.compact(),
            budget: self.budget,
        }
    }

    /// Tab bar on top, status line at the bottom
    fn body_area(full: Rect) -> Rect {
        Rect {
            x: full.x,
            y: full.y + 1,
            width: full.width,
            height: full.height.saturating_sub(2),
        }
    }

    fn content_height(&self) -> usize {
        self.metrics().content_height(self.window.months())
    }

    fn max_scroll(&self) -> usize {
        self.content_height()
            .saturating_sub(Self::body_area(self.viewport).height as usize)
    }

    /// Month under the top of the viewport
    fn focused_month(&self) -> Option<MonthKey> {
        self.metrics()
            .month_at(self.window.months(), self.scroll)
            .map(|(key, _)| key)
    }

    /// Record the terminal size; positions the first view and keeps the
    /// window filled after a resize
    pub fn set_viewport(&mut self, area: Rect) {
        if self.viewport == area {
            return;
        }
        let focused = self.focused_month();
        let was_compact = self.compact();
        self.viewport = area;

        if self.positioned && was_compact != self.compact() {
            if let Some(key) = focused {
                self.scroll_to_month(key);
                return;
            }
        }
        self.position_initial();
        self.sync_window();
    }

    /// Put today's month at the top once events and a viewport exist
    fn position_initial(&mut self) {
        if self.positioned || !matches!(self.state, AppState::Ready) || self.viewport.height == 0 {
            return;
        }
        let key = MonthKey::from_date(self.today);
        if let Some(top) = self.metrics().month_top(self.window.months(), key) {
            self.scroll = self.window.initial_offset(top).min(self.max_scroll());
        }
        self.positioned = true;
        log::debug!("event=initial_position month={} offset={}", key, self.scroll);
    }

    /// Feed the current position to the scroll window until it stops
    /// growing, applying prepend compensation
    fn sync_window(&mut self) {
        let viewport = Self::body_area(self.viewport).height as usize;
        if viewport == 0 || !self.positioned {
            return;
        }
        for _ in 0..MAX_SYNC_ROUNDS {
            let metrics = ScrollMetrics {
                offset: self.scroll,
                viewport,
                content: Some(self.content_height()),
            };
            let extension = self.window.on_scroll(metrics);
            if extension.is_empty() {
                break;
            }
            if !extension.prepended.is_empty() {
                let after = Some(self.content_height());
                if let Some(offset) = self.window.commit_measurement(after) {
                    self.scroll = offset;
                }
            }
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        self.sync_window();
    }

    fn scroll_to_month(&mut self, key: MonthKey) {
        self.window.ensure_contains(key);
        // A second pass once appended months make room below the target
        for _ in 0..2 {
            if let Some(top) = self.metrics().month_top(self.window.months(), key) {
                self.scroll = top.min(self.max_scroll());
            }
            self.sync_window();
        }
    }

    fn step_month(&mut self, delta: i32) {
        if let Some(key) = self.focused_month() {
            self.scroll_to_month(key.offset(delta));
        }
    }

    fn page_rows(&self) -> isize {
        (Self::body_area(self.viewport).height as isize - 2).max(1)
    }

    /// Events shown in the day list for `date`, in cell order
    fn day_events(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let layout = build_month_layout(&self.events, MonthKey::from_date(date), self.budget);
        layout
            .cell(date)
            .map(|cell| cell.events().to_vec())
            .unwrap_or_default()
    }

    fn event_by_id(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    fn activate_event(&mut self, id: String) {
        if let Some(index) = self.events.iter().position(|event| event.id == id) {
            self.callbacks.on_event_activate(&self.events[index]);
            self.overlay = Overlay::EventDetail { id };
        }
    }

    fn select_range(&mut self, range: DateRange) {
        self.callbacks.on_range_select(range);
        self.overlay = Overlay::NewEvent { range };
    }

    /// Handle terminal input
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.set_viewport(Rect::new(0, 0, width, height)),
            // A release outside the terminal never arrives
            Event::FocusLost => self.drag.release_all(),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.overlay.is_open() {
            self.handle_overlay_key(code);
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.overlay = Overlay::Help,
            KeyCode::Tab => self.current_tab = self.current_tab.next(),
            KeyCode::BackTab => self.current_tab = self.current_tab.prev(),
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                    self.current_tab = tab;
                }
            }
            KeyCode::Char('r') => self.refresh_requested = true,
            _ if !matches!(self.state, AppState::Ready) => {}
            _ => match self.current_tab {
                Tab::Month => self.handle_month_key(code),
                Tab::Agenda => self.handle_agenda_key(code),
            },
        }
    }

    fn handle_month_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-self.page_rows()),
            KeyCode::PageDown => self.scroll_by(self.page_rows()),
            KeyCode::Left | KeyCode::Char('p') => self.step_month(-1),
            KeyCode::Right | KeyCode::Char('n') => self.step_month(1),
            KeyCode::Char('t') => self.scroll_to_month(MonthKey::from_date(self.today)),
            KeyCode::Char('c') => {
                let focused = self.focused_month();
                self.compact_override = Some(!self.compact());
                if let Some(key) = focused {
                    self.scroll_to_month(key);
                }
            }
            _ => {}
        }
    }

    fn handle_agenda_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_agenda(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_agenda(1),
            KeyCode::PageUp => self.scroll_agenda(-self.page_rows()),
            KeyCode::PageDown => self.scroll_agenda(self.page_rows()),
            _ => {}
        }
    }

    /// Scroll the agenda, loading another page when the end comes into view
    fn scroll_agenda(&mut self, delta: isize) {
        let page = Agenda::new(&self.events).first(self.agenda_shown);
        let lines = agenda::line_count(&page);
        let viewport = Self::body_area(self.viewport).height as usize;
        let has_more = page.has_more;

        self.agenda_scroll = self
            .agenda_scroll
            .saturating_add_signed(delta)
            .min(lines.saturating_sub(viewport));
        if has_more && self.agenda_scroll + viewport + self.window.config().threshold >= lines {
            self.agenda_shown += PAGE_SIZE;
            log::debug!("event=agenda_page shown={}", self.agenda_shown);
        }
    }

    fn handle_overlay_key(&mut self, code: KeyCode) {
        match self.overlay.clone() {
            Overlay::Help => {
                if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                    self.overlay = Overlay::None;
                }
            }
            Overlay::DayList { date, selected } => {
                let count = self.day_events(date).len();
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => self.overlay = Overlay::None,
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.overlay = Overlay::DayList {
                            date,
                            selected: selected.saturating_sub(1),
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.overlay = Overlay::DayList {
                            date,
                            selected: (selected + 1).min(count.saturating_sub(1)),
                        }
                    }
                    KeyCode::Enter => {
                        let id = self.day_events(date).get(selected).map(|event| event.id.clone());
                        if let Some(id) = id {
                            self.activate_event(id);
                        }
                    }
                    KeyCode::Char('a') => self.select_range(DateRange::single_day(date)),
                    _ => {}
                }
            }
            Overlay::EventDetail { .. } | Overlay::NewEvent { .. } => {
                if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
                    self.overlay = Overlay::None;
                }
            }
            Overlay::None => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(self.state, AppState::Ready) {
            return;
        }
        if self.overlay.is_open() {
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                self.click_overlay(mouse.column, mouse.row);
            }
            return;
        }

        match (self.current_tab, mouse.kind) {
            (Tab::Agenda, MouseEventKind::ScrollUp) => self.scroll_agenda(-(WHEEL_STEP as isize)),
            (Tab::Agenda, MouseEventKind::ScrollDown) => self.scroll_agenda(WHEEL_STEP as isize),
            (Tab::Agenda, _) => {}
            // No wheel scrolling while a drag owns the pointer
            (Tab::Month, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown) if self.drag.gestures_suppressed() => {}
            (Tab::Month, MouseEventKind::ScrollUp) => self.scroll_by(-(WHEEL_STEP as isize)),
            (Tab::Month, MouseEventKind::ScrollDown) => self.scroll_by(WHEEL_STEP as isize),
            (Tab::Month, MouseEventKind::Down(MouseButton::Left)) => self.mouse_down(mouse.column, mouse.row),
            (Tab::Month, MouseEventKind::Drag(MouseButton::Left)) => {
                if let Some(hit) = self.hit(mouse.column, mouse.row) {
                    self.drag.pointer_enter(MOUSE_POINTER, hit.date());
                }
            }
            (Tab::Month, MouseEventKind::Up(MouseButton::Left)) => {
                if let Some(hit) = self.hit(mouse.column, mouse.row) {
                    self.drag.pointer_enter(MOUSE_POINTER, hit.date());
                }
                if let Some(range) = self.drag.pointer_up(MOUSE_POINTER) {
                    self.select_range(range);
                }
            }
            _ => {}
        }
    }

    fn hit(&self, x: u16, y: u16) -> Option<Hit> {
        hit_test(
            &self.events,
            self.window.months(),
            self.metrics(),
            Self::body_area(self.viewport),
            self.scroll,
            x,
            y,
        )
    }

    fn mouse_down(&mut self, x: u16, y: u16) {
        match self.hit(x, y) {
            Some(Hit::Event { id, .. }) => self.activate_event(id),
            Some(Hit::More(date)) => self.overlay = Overlay::DayList { date, selected: 0 },
            Some(Hit::Cell(date)) => {
                if self.compact() && !self.day_events(date).is_empty() {
                    self.overlay = Overlay::DayList { date, selected: 0 };
                } else {
                    self.drag.pointer_down(MOUSE_POINTER, date, self.overlay.is_open());
                }
            }
            None => {}
        }
    }

    /// Clicks inside the day list pick an entry; clicks outside any
    /// overlay close it
    fn click_overlay(&mut self, x: u16, y: u16) {
        let full = self.viewport;
        let inside = |area: Rect| x >= area.x && x < area.right() && y >= area.y && y < area.bottom();

        match self.overlay.clone() {
            Overlay::DayList { date, selected } => {
                let events = self.day_events(date);
                let area = DayListSheet::area(full, events.len());
                if !inside(area) {
                    self.overlay = Overlay::None;
                    return;
                }
                let id = DayListSheet::entry_at(area, events.len(), selected, y).map(|index| events[index].id.clone());
                if let Some(id) = id {
                    self.activate_event(id);
                }
            }
            Overlay::Help => {
                if !inside(HelpPopup::centered_area(full)) {
                    self.overlay = Overlay::None;
                }
            }
            Overlay::EventDetail { .. } => {
                if !inside(EventDetailPopup::centered_area(full)) {
                    self.overlay = Overlay::None;
                }
            }
            Overlay::NewEvent { .. } => {
                if !inside(NewEventPopup::centered_area(full)) {
                    self.overlay = Overlay::None;
                }
            }
            Overlay::None => {}
        }
    }

    /// Manual reload request, cleared on read
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// A reload is about to start
    pub fn begin_reload(&mut self, reason: RefreshSignal) {
        self.reloading = Some(reason);
        if matches!(self.state, AppState::Error { .. }) {
            self.state = AppState::Loading {
                spinner_frame: 0,
                stage: LoadingStage::Reloading(reason),
            };
        }
    }

    /// Apply a finished (re)load. A failed reload keeps the events on
    /// screen and records a warning.
    pub fn apply_load_result(&mut self, result: Result<LoadedEvents, String>) {
        self.reloading = None;
        match result {
            Ok(loaded) => {
                self.events = loaded.events;
                self.warnings = loaded.warnings;
                self.state = AppState::Ready;
                if let Overlay::EventDetail { id } = &self.overlay {
                    if self.event_by_id(id).is_none() {
                        self.overlay = Overlay::None;
                    }
                }
                self.position_initial();
                self.sync_window();
            }
            Err(message) => {
                log::error!("event=load_failed error={}", message);
                if matches!(self.state, AppState::Ready) {
                    self.warnings.push(LoadWarning::LoadFailed(message));
                } else {
                    self.state = AppState::Error { message };
                }
            }
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame, stage } = &self.state {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(*spinner_frame),
                stage: *stage,
            };
        }
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn title(&self) -> String {
        match self.current_tab {
            Tab::Month => self.focused_month().map(MonthKey::label).unwrap_or_default(),
            Tab::Agenda => "Agenda".to_string(),
        }
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted());
        let left = if let Some(reason) = self.reloading {
            LoadingStage::Reloading(reason).message().to_string()
        } else if !self.warnings.is_empty() {
            format!("{} load warning(s), see log", self.warnings.len())
        } else {
            format!("{} events", self.events.len())
        };
        let style = if self.warnings.is_empty() {
            muted
        } else {
            Style::default().fg(self.theme.error())
        };
        buf.set_stringn(area.x + 1, area.y, &left, area.width as usize, style);

        let right = "drag: select  click: open  ?: help";
        let width = right.chars().count() as u16;
        if area.width > width + left.len() as u16 + 4 {
            buf.set_string(area.x + area.width - width - 1, area.y, right, muted);
        }
    }

    fn render_overlay(&self, area: Rect, buf: &mut Buffer) {
        match &self.overlay {
            Overlay::None => {}
            Overlay::Help => HelpPopup::new(self.theme).render(HelpPopup::centered_area(area), buf),
            Overlay::DayList { date, selected } => {
                let events = self.day_events(*date);
                let sheet = DayListSheet::area(area, events.len());
                DayListSheet::new(*date, &events, *selected, self.theme).render(sheet, buf);
            }
            Overlay::EventDetail { id } => {
                if let Some(event) = self.event_by_id(id) {
                    EventDetailPopup::new(event, self.theme).render(EventDetailPopup::centered_area(area), buf);
                }
            }
            Overlay::NewEvent { range } => {
                NewEventPopup::new(*range, self.theme).render(NewEventPopup::centered_area(area), buf)
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading { spinner_frame, stage } => {
                Spinner::new(*spinner_frame, *stage, self.theme)
                    .with_source(self.events_dir.as_deref())
                    .render(area, buf);
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.error()));
            }
            AppState::Ready => {
                let title = self.title();
                TabBar::new(self.current_tab, &title, self.theme).render(Rect { height: 1, ..area }, buf);

                let body = App::body_area(area);
                match self.current_tab {
                    Tab::Month => MonthView::new(
                        &self.events,
                        self.window.months(),
                        self.metrics(),
                        self.scroll,
                        self.today,
                        &self.drag,
                    )
                    .with_theme(self.theme)
                    .render(body, buf),
                    Tab::Agenda => {
                        let page = Agenda::new(&self.events).first(self.agenda_shown);
                        AgendaView::new(&page, self.agenda_scroll, self.today, self.theme).render(body, buf);
                    }
                }

                if area.height > 2 {
                    let status = Rect {
                        y: area.y + area.height - 1,
                        height: 1,
                        ..area
                    };
                    self.render_status(status, buf);
                }

                self.render_overlay(area, buf);
            }
        }
    }
}

/// Launch settings resolved from config and command line
pub struct RunOptions {
    pub events_dir: PathBuf,
    pub compact: Option<bool>,
}

/// Run the TUI application
pub fn run(config: Config, options: RunOptions) -> anyhow::Result<()> {
    // Detection queries the terminal, so it must run before raw mode
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = crossterm::execute!(stdout(), EnableMouseCapture, EnableFocusChange)
        .map_err(anyhow::Error::from)
        .and_then(|()| run_app(&mut terminal, &config, options, theme));
    let _ = crossterm::execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();
    result
}

/// One background load. A loader thread that dies without answering
/// counts as a failed load.
struct PendingLoad(Receiver<Result<LoadedEvents, String>>);

impl PendingLoad {
    fn spawn(loader: &Arc<EventLoaderService>) -> Self {
        let (tx, rx) = mpsc::channel();
        let loader = Arc::clone(loader);
        thread::spawn(move || {
            let result = loader.load().map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
        Self(rx)
    }

    fn poll(&self) -> Option<Result<LoadedEvents, String>> {
        match self.0.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err("event loader stopped before finishing".to_string())),
        }
    }
}

fn run_app(terminal: &mut DefaultTerminal, config: &Config, options: RunOptions, theme: Theme) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let mut app = App::new(config, today, theme)
        .with_compact(options.compact)
        .with_events_dir(options.events_dir.clone());

    let loader = Arc::new(EventLoaderService::new(
        options.events_dir.clone(),
        config.color_overrides.clone(),
    ));
    let mut pending = Some(PendingLoad::spawn(&loader));
    let mut reload_queued: Option<RefreshSignal> = None;

    let (refresh_tx, refresh_rx) = mpsc::channel();
    let _watcher = DirectoryWatcher::spawn(
        options.events_dir,
        Duration::from_secs(config.refresh_interval_secs.max(1)),
        refresh_tx.clone(),
    );

    loop {
        let size = terminal.size()?;
        app.set_viewport(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if let Some(result) = pending.as_ref().and_then(PendingLoad::poll) {
            pending = None;
            app.apply_load_result(result);
        }

        if app.take_refresh_request() {
            let _ = refresh_tx.send(RefreshSignal::Manual);
        }
        while let Ok(signal) = refresh_rx.try_recv() {
            log::debug!("event=refresh_received signal={:?}", signal);
            // A manual request outranks a file change for the status text
            if reload_queued != Some(RefreshSignal::Manual) {
                reload_queued = Some(signal);
            }
        }
        if pending.is_none() {
            if let Some(reason) = reload_queued.take() {
                app.begin_reload(reason);
                pending = Some(PendingLoad::spawn(&loader));
            }
        }

        // Poll with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

//! App state and core browse logic
//!
//! The browse state machine owns the active tab, category filter, search
//! query, per-tab caches, and connection status. Transitions are pure:
//! they mutate state and return [`Command`] values for the driver to run
//! as async tasks; completions come back as [`Msg`] values applied here.
//! All mutation happens on the single event-loop thread.
//!
//! Every fetch carries a monotonically increasing token per tab (searches
//! have their own counter). A completion whose token is no longer the
//! latest issued for its key is discarded, so a slow stale response can
//! never overwrite the result of a newer request.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{ApiStatus, ConnectionCheck, PlaylistInfo};
use crate::cache::ContentCache;
use crate::models::{
    Category, ConnectionStatus, ContentItem, ContentType, Credential, SearchResults,
};
use crate::player::PlayerEvent;

/// Quiet period after the last keystroke before a search is dispatched
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Fallback playlist display name, matching the backend default
pub const DEFAULT_PLAYLIST_NAME: &str = "My IPTV";

// =============================================================================
// Commands and Messages
// =============================================================================

/// Side effects requested by a transition. The driver runs each as a
/// spawned task and reports back with a [`Msg`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Persist a freshly validated credential
    SaveCredential(Credential),
    /// Remove the persisted credential (logout)
    ClearCredential,
    /// POST the credential to the backend, then test the connection
    Setup,
    /// Re-test the backend connection
    TestConnection,
    /// Best-effort playlist metadata fetch
    FetchPlaylistInfo,
    /// Fetch the item list for a tab
    FetchStreams {
        tab: ContentType,
        category_id: Option<String>,
        token: u64,
    },
    /// Fetch the category list for a tab
    FetchCategories { tab: ContentType, token: u64 },
    /// Dispatch a debounced search
    Search { query: String, token: u64 },
    /// Launch the external player for an item
    Play { item: ContentItem },
}

/// Completion messages applied back into the state machine
#[derive(Debug)]
pub enum Msg {
    ConnectionChecked(Result<ConnectionCheck, String>),
    PlaylistInfoLoaded(Result<PlaylistInfo, String>),
    StreamsLoaded {
        tab: ContentType,
        token: u64,
        result: Result<Vec<ContentItem>, String>,
    },
    CategoriesLoaded {
        tab: ContentType,
        token: u64,
        result: Result<Vec<Category>, String>,
    },
    SearchLoaded {
        token: u64,
        result: Result<SearchResults, String>,
    },
    Player(PlayerEvent),
}

// =============================================================================
// Screens and Input Mode
// =============================================================================

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Credential setup form
    #[default]
    Setup,
    /// Tab/category/search browse view
    Browse,
    /// External player running
    Playing,
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// List Selection State
// =============================================================================

/// Selection state for the content list
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update offset to keep the selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Update length, clamping the selection into range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Setup Form
// =============================================================================

/// Fields of the credential form, in focus order
pub const SETUP_FIELDS: [&str; 4] = ["Playlist name", "Username", "Password", "Server URL"];

/// State of the credential setup form. Validation happens here; an
/// invalid credential never reaches the rest of the system.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub values: [String; 4],
    pub focus: usize,
    pub error: Option<String>,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            values: [
                String::new(),
                String::new(),
                String::new(),
                "http://".to_string(),
            ],
            focus: 0,
            error: None,
        }
    }
}

impl SetupForm {
    pub fn insert(&mut self, c: char) {
        self.values[self.focus].push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % SETUP_FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + SETUP_FIELDS.len() - 1) % SETUP_FIELDS.len();
    }

    /// Validate and build a credential, recording the failure for display
    pub fn submit(&mut self) -> Option<Credential> {
        let playlist_name = self.values[0].trim();
        let credential = Credential {
            playlist_name: if playlist_name.is_empty() {
                None
            } else {
                Some(playlist_name.to_string())
            },
            username: self.values[1].trim().to_string(),
            password: self.values[2].trim().to_string(),
            server_url: self.values[3].trim().to_string(),
        };
        match credential.validate() {
            Ok(()) => Some(credential),
            Err(msg) => {
                self.error = Some(msg.to_string());
                None
            }
        }
    }
}

// =============================================================================
// Browse State
// =============================================================================

/// A search waiting out its debounce window
#[derive(Debug, Clone)]
struct PendingSearch {
    query: String,
    deadline: Instant,
}

/// State of the browse screen
#[derive(Debug)]
pub struct BrowseState {
    pub active_tab: ContentType,
    pub active_category: Option<String>,
    pub search_query: String,
    pub search_cursor: usize,
    pub search_results: Option<SearchResults>,
    pub connection: ConnectionStatus,
    pub connection_message: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub list: ListState,
    pending_search: Option<PendingSearch>,
    stream_tokens: HashMap<ContentType, u64>,
    category_tokens: HashMap<ContentType, u64>,
    search_token: u64,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            active_tab: ContentType::Live,
            active_category: None,
            search_query: String::new(),
            search_cursor: 0,
            search_results: None,
            connection: ConnectionStatus::Disconnected,
            connection_message: None,
            loading: false,
            error: None,
            list: ListState::default(),
            pending_search: None,
            stream_tokens: HashMap::new(),
            category_tokens: HashMap::new(),
            search_token: 0,
        }
    }
}

impl BrowseState {
    /// Issue the next fetch token for a tab, superseding any in-flight fetch
    fn next_stream_token(&mut self, tab: ContentType) -> u64 {
        let token = self.stream_tokens.entry(tab).or_insert(0);
        *token += 1;
        *token
    }

    /// Whether a completion token is still the latest issued for its tab
    fn is_current_stream_token(&self, tab: ContentType, token: u64) -> bool {
        self.stream_tokens.get(&tab).copied() == Some(token)
    }

    /// Category fetches are tokened independently of stream fetches
    fn next_category_token(&mut self, tab: ContentType) -> u64 {
        let token = self.category_tokens.entry(tab).or_insert(0);
        *token += 1;
        *token
    }

    fn is_current_category_token(&self, tab: ContentType, token: u64) -> bool {
        self.category_tokens.get(&tab).copied() == Some(token)
    }

    /// Whether a search is currently displayed instead of tab content
    pub fn searching(&self) -> bool {
        !self.search_query.trim().is_empty()
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub running: bool,
    pub input_mode: InputMode,
    pub setup: SetupForm,
    pub browse: BrowseState,
    pub cache: ContentCache,
    /// Display name from playlist-info, falling back to the credential's
    pub playlist_name: String,
    /// Item currently selected for playback
    pub current_stream: Option<ContentItem>,
    /// Dismissible playback error banner; independent of browse state
    pub banner: Option<String>,
    /// Initial content load already triggered
    content_started: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            screen: Screen::Setup,
            running: true,
            input_mode: InputMode::Normal,
            setup: SetupForm::default(),
            browse: BrowseState::default(),
            cache: ContentCache::new(),
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            current_stream: None,
            banner: None,
            content_started: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Session Lifecycle
    // -------------------------------------------------------------------------

    /// Begin a session with an existing credential: register it with the
    /// backend, test the connection, and land on the browse screen.
    pub fn start_session(&mut self, credential: &Credential) -> Vec<Command> {
        if let Some(name) = credential.playlist_name.as_deref() {
            if !name.is_empty() {
                self.playlist_name = name.to_string();
            }
        }
        self.screen = Screen::Browse;
        self.browse.connection = ConnectionStatus::Connecting;
        vec![Command::Setup]
    }

    /// User-triggered connection retry
    pub fn retry_connection(&mut self) -> Vec<Command> {
        self.browse.connection = ConnectionStatus::Connecting;
        self.browse.connection_message = None;
        vec![Command::TestConnection]
    }

    /// Sign out: forget the credential, drop all cached content, and
    /// return to the setup form with pristine state.
    pub fn logout(&mut self) -> Vec<Command> {
        self.cache.clear();
        self.browse = BrowseState::default();
        self.current_stream = None;
        self.banner = None;
        self.playlist_name = DEFAULT_PLAYLIST_NAME.to_string();
        self.setup = SetupForm::default();
        self.screen = Screen::Setup;
        self.input_mode = InputMode::Normal;
        self.content_started = false;
        vec![Command::ClearCredential]
    }

    // -------------------------------------------------------------------------
    // Browse Transitions
    // -------------------------------------------------------------------------

    /// Switch tabs. Resets the category filter to "All"; an active
    /// search query survives the switch, with the grid showing the new
    /// tab's slice of the same result set. Fetches the tab's content
    /// unless it is already cached.
    pub fn select_tab(&mut self, tab: ContentType) -> Vec<Command> {
        self.browse.active_tab = tab;
        self.browse.active_category = None;
        self.browse.list.reset();

        let mut commands = Vec::new();
        if self.cache.get(tab).is_none() {
            let token = self.browse.next_stream_token(tab);
            if !self.browse.searching() {
                self.browse.loading = true;
                self.browse.error = None;
            }
            commands.push(Command::FetchStreams {
                tab,
                category_id: None,
                token,
            });
        } else {
            // The filter reset must also supersede any fetch still in
            // flight for this tab, or a filtered response issued before
            // the switch could land later and replace the cached
            // unfiltered list
            self.browse.next_stream_token(tab);
            if !self.browse.searching() {
                self.browse.loading = false;
            }
        }
        if self.cache.get_categories(tab).is_none() {
            let token = self.browse.next_category_token(tab);
            commands.push(Command::FetchCategories { tab, token });
        }
        self.refresh_list_len();
        commands
    }

    /// Apply a category filter (`None` = all categories). Always
    /// re-fetches; filtered lists are never cached separately from "all",
    /// so going back to "All" must hit the server again.
    pub fn select_category(&mut self, category_id: Option<String>) -> Vec<Command> {
        let tab = self.browse.active_tab;
        self.browse.active_category = category_id.clone();
        let token = self.browse.next_stream_token(tab);
        self.browse.loading = true;
        self.browse.error = None;
        self.browse.list.reset();
        vec![Command::FetchStreams {
            tab,
            category_id,
            token,
        }]
    }

    /// Cycle the category filter left or right through "All" plus the
    /// tab's cached categories
    pub fn cycle_category(&mut self, forward: bool) -> Vec<Command> {
        let ids: Vec<String> = self
            .cache
            .get_categories(self.browse.active_tab)
            .map(|cats| cats.iter().map(|c| c.category_id.clone()).collect())
            .unwrap_or_default();
        if ids.is_empty() {
            return Vec::new();
        }

        // Position 0 is "All"; categories follow in order
        let current = match &self.browse.active_category {
            None => 0,
            Some(id) => ids.iter().position(|c| c == id).map(|i| i + 1).unwrap_or(0),
        };
        let count = ids.len() + 1;
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        let selection = if next == 0 {
            None
        } else {
            Some(ids[next - 1].clone())
        };
        self.select_category(selection)
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Replace the query text. The query field updates synchronously for
    /// input responsiveness; the network dispatch waits out the debounce
    /// window, and each keystroke restarts the clock. An emptied query
    /// cancels any pending dispatch and clears results with no request.
    pub fn set_search_query(&mut self, text: impl Into<String>, now: Instant) {
        self.browse.search_query = text.into();
        // End of string is always a char boundary; a byte-clamped carry
        // over from the previous query need not be
        self.browse.search_cursor = self.browse.search_query.len();
        self.reschedule_search(now);
    }

    pub fn search_insert(&mut self, c: char, now: Instant) {
        let cursor = self.browse.search_cursor;
        self.browse.search_query.insert(cursor, c);
        self.browse.search_cursor += c.len_utf8();
        self.reschedule_search(now);
    }

    pub fn search_backspace(&mut self, now: Instant) {
        if self.browse.search_cursor > 0 {
            let prev = self.browse.search_query[..self.browse.search_cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.browse.search_cursor -= prev;
            let cursor = self.browse.search_cursor;
            self.browse.search_query.remove(cursor);
            self.reschedule_search(now);
        }
    }

    pub fn search_cursor_left(&mut self) {
        let before = &self.browse.search_query[..self.browse.search_cursor];
        if let Some(c) = before.chars().next_back() {
            self.browse.search_cursor -= c.len_utf8();
        }
    }

    pub fn search_cursor_right(&mut self) {
        let after = &self.browse.search_query[self.browse.search_cursor..];
        if let Some(c) = after.chars().next() {
            self.browse.search_cursor += c.len_utf8();
        }
    }

    /// Clear the query and results without any network call
    pub fn clear_search(&mut self) {
        self.browse.search_query.clear();
        self.browse.search_cursor = 0;
        self.browse.search_results = None;
        self.browse.pending_search = None;
        self.refresh_list_len();
    }

    fn reschedule_search(&mut self, now: Instant) {
        let trimmed = self.browse.search_query.trim();
        if trimmed.is_empty() {
            // Cancels a pending dispatch; zero network calls
            self.browse.pending_search = None;
            self.browse.search_results = None;
        } else {
            self.browse.pending_search = Some(PendingSearch {
                query: trimmed.to_string(),
                deadline: now + SEARCH_DEBOUNCE,
            });
        }
        self.refresh_list_len();
    }

    /// Advance timers: dispatch a pending search whose debounce window has
    /// elapsed. Called from the event loop on every tick.
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        let due = self
            .browse
            .pending_search
            .as_ref()
            .map(|p| p.deadline <= now)
            .unwrap_or(false);
        if !due {
            return Vec::new();
        }
        let pending = self.browse.pending_search.take().expect("checked above");
        self.dispatch_search(pending.query)
    }

    /// Dispatch a pending search immediately (enter key skips the wait)
    pub fn flush_search(&mut self) -> Vec<Command> {
        match self.browse.pending_search.take() {
            Some(pending) => self.dispatch_search(pending.query),
            None => Vec::new(),
        }
    }

    fn dispatch_search(&mut self, query: String) -> Vec<Command> {
        self.browse.search_token += 1;
        self.browse.loading = true;
        vec![Command::Search {
            query,
            token: self.browse.search_token,
        }]
    }

    // -------------------------------------------------------------------------
    // Playback
    // -------------------------------------------------------------------------

    /// Select an item for playback. No network call: items already carry
    /// their stream URL. Unplayable items (series shows) raise a banner.
    pub fn play_item(&mut self, item: ContentItem) -> Vec<Command> {
        if !item.is_playable() {
            self.banner = Some(format!("No stream URL for \"{}\"", item.name));
            return Vec::new();
        }
        self.current_stream = Some(item.clone());
        self.screen = Screen::Playing;
        vec![Command::Play { item }]
    }

    /// Play the currently highlighted item, if any
    pub fn play_selected(&mut self) -> Vec<Command> {
        let item = self
            .displayed_items()
            .get(self.browse.list.selected)
            .cloned();
        match item {
            Some(item) => self.play_item(item),
            None => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Display Resolution
    // -------------------------------------------------------------------------

    /// The list the content grid should show: the active tab's search
    /// slice while a query is live, the cached tab list otherwise.
    pub fn displayed_items(&self) -> &[ContentItem] {
        if self.browse.searching() {
            self.browse
                .search_results
                .as_ref()
                .map(|r| r.for_tab(self.browse.active_tab))
                .unwrap_or(&[])
        } else {
            self.cache.get(self.browse.active_tab).unwrap_or(&[])
        }
    }

    /// Categories for the active tab (empty until fetched)
    pub fn displayed_categories(&self) -> &[Category] {
        self.cache
            .get_categories(self.browse.active_tab)
            .unwrap_or(&[])
    }

    fn refresh_list_len(&mut self) {
        let len = self.displayed_items().len();
        self.browse.list.set_len(len);
    }

    // -------------------------------------------------------------------------
    // Message Application
    // -------------------------------------------------------------------------

    /// Apply a completion message. Stale tokens are discarded here; this
    /// is the single place fetch results enter the state.
    pub fn apply(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::ConnectionChecked(result) => self.apply_connection(result),

            Msg::PlaylistInfoLoaded(result) => {
                // Best-effort metadata: failure keeps the default name
                match result {
                    Ok(info) => {
                        if let Some(name) = info.name {
                            if !name.is_empty() {
                                self.playlist_name = name;
                            }
                        }
                    }
                    Err(e) => log::debug!("playlist info unavailable: {}", e),
                }
                Vec::new()
            }

            Msg::StreamsLoaded { tab, token, result } => {
                if !self.browse.is_current_stream_token(tab, token) {
                    log::debug!("discarding stale streams response for {} (token {})", tab, token);
                    return Vec::new();
                }
                if tab == self.browse.active_tab {
                    self.browse.loading = false;
                }
                match result {
                    Ok(items) => {
                        self.cache.put(tab, items);
                        if tab == self.browse.active_tab {
                            self.browse.error = None;
                        }
                    }
                    Err(e) => {
                        // No fallback to a stale filtered list: empty grid
                        // plus the error banner, retry re-fetches.
                        self.cache.put(tab, Vec::new());
                        if tab == self.browse.active_tab {
                            self.browse.error = Some(e);
                        }
                    }
                }
                self.refresh_list_len();
                Vec::new()
            }

            Msg::CategoriesLoaded { tab, token, result } => {
                if !self.browse.is_current_category_token(tab, token) {
                    return Vec::new();
                }
                match result {
                    Ok(categories) => self.cache.put_categories(tab, categories),
                    Err(e) => log::warn!("categories fetch failed for {}: {}", tab, e),
                }
                Vec::new()
            }

            Msg::SearchLoaded { token, result } => {
                if token != self.browse.search_token {
                    log::debug!("discarding stale search response (token {})", token);
                    return Vec::new();
                }
                self.browse.loading = false;
                // Query cleared while the search was in flight
                if !self.browse.searching() {
                    return Vec::new();
                }
                match result {
                    Ok(results) => {
                        self.browse.search_results = Some(results);
                        self.browse.error = None;
                    }
                    Err(e) => {
                        self.browse.search_results = Some(SearchResults::default());
                        self.browse.error = Some(e);
                    }
                }
                self.refresh_list_len();
                Vec::new()
            }

            Msg::Player(event) => self.apply_player_event(event),
        }
    }

    fn apply_connection(&mut self, result: Result<ConnectionCheck, String>) -> Vec<Command> {
        match result {
            Ok(check) => {
                self.browse.connection = match check.status {
                    ApiStatus::Success => ConnectionStatus::Connected,
                    ApiStatus::DemoMode => ConnectionStatus::Demo,
                    ApiStatus::Failure => ConnectionStatus::Error,
                };
                self.browse.connection_message = check.message;
            }
            Err(e) => {
                self.browse.connection = ConnectionStatus::Error;
                self.browse.connection_message = Some(e);
            }
        }

        // A failed test never blocks browsing: content loads regardless,
        // the status bar just offers a retry.
        if self.content_started {
            return Vec::new();
        }
        self.content_started = true;
        let mut commands = vec![Command::FetchPlaylistInfo];
        commands.extend(self.select_tab(self.browse.active_tab));
        commands
    }

    fn apply_player_event(&mut self, event: PlayerEvent) -> Vec<Command> {
        match event {
            PlayerEvent::Started => {}
            PlayerEvent::Exited { clean } => {
                if !clean {
                    self.banner = Some("Playback ended with an error".to_string());
                }
                self.current_stream = None;
                if self.screen == Screen::Playing {
                    self.screen = Screen::Browse;
                }
            }
            PlayerEvent::Failed(msg) => {
                self.banner = Some(msg);
                self.current_stream = None;
                if self.screen == Screen::Playing {
                    self.screen = Screen::Browse;
                }
            }
        }
        Vec::new()
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle a keyboard event, returning any commands to run
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Command> {
        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return Vec::new();
        }

        // A visible banner swallows the next keypress to dismiss itself
        if self.banner.is_some() {
            self.banner = None;
            return Vec::new();
        }

        match self.screen {
            Screen::Setup => self.handle_setup_key(key),
            Screen::Browse => {
                if self.input_mode == InputMode::Editing {
                    self.handle_search_key(key, now)
                } else {
                    self.handle_browse_key(key)
                }
            }
            Screen::Playing => self.handle_playing_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.setup.next_field();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.setup.prev_field();
                Vec::new()
            }
            KeyCode::Backspace => {
                self.setup.backspace();
                Vec::new()
            }
            KeyCode::Char(c) => {
                self.setup.insert(c);
                Vec::new()
            }
            KeyCode::Enter => match self.setup.submit() {
                Some(credential) => {
                    let mut commands = vec![Command::SaveCredential(credential.clone())];
                    commands.extend(self.start_session(&credential));
                    commands
                }
                None => Vec::new(),
            },
            KeyCode::Esc => {
                self.running = false;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => {
                self.running = false;
                Vec::new()
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.input_mode = InputMode::Editing;
                Vec::new()
            }
            KeyCode::Esc => {
                if self.browse.searching() {
                    self.clear_search();
                }
                Vec::new()
            }
            KeyCode::Tab => {
                let tab = self.browse.active_tab.next();
                self.select_tab(tab)
            }
            KeyCode::BackTab => {
                let tab = self.browse.active_tab.prev();
                self.select_tab(tab)
            }
            KeyCode::Char('1') => self.select_tab(ContentType::Live),
            KeyCode::Char('2') => self.select_tab(ContentType::Vod),
            KeyCode::Char('3') => self.select_tab(ContentType::Series),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_category(false),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_category(true),
            KeyCode::Up | KeyCode::Char('k') => {
                self.browse.list.up();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.browse.list.down();
                Vec::new()
            }
            KeyCode::PageUp => {
                self.browse.list.page_up(10);
                Vec::new()
            }
            KeyCode::PageDown => {
                self.browse.list.page_down(10);
                Vec::new()
            }
            KeyCode::Enter => self.play_selected(),
            KeyCode::Char('r') => {
                // Retry: re-test the connection if it failed, and re-issue
                // the last fetch if the grid errored out
                let mut commands = Vec::new();
                if self.browse.connection.can_retry() {
                    commands.extend(self.retry_connection());
                }
                if self.browse.error.is_some() {
                    let category = self.browse.active_category.clone();
                    commands.extend(self.select_category(category));
                }
                commands
            }
            KeyCode::Char('o') => self.logout(),
            _ => Vec::new(),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Vec::new()
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.flush_search()
            }
            KeyCode::Char(c) => {
                self.search_insert(c, now);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.search_backspace(now);
                Vec::new()
            }
            KeyCode::Left => {
                self.search_cursor_left();
                Vec::new()
            }
            KeyCode::Right => {
                self.search_cursor_right();
                Vec::new()
            }
            KeyCode::Home => {
                self.browse.search_cursor = 0;
                Vec::new()
            }
            KeyCode::End => {
                self.browse.search_cursor = self.browse.search_query.len();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_playing_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            // The external player keeps running; this just returns to the grid
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.screen = Screen::Browse;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, url: Option<&str>) -> ContentItem {
        ContentItem {
            stream_id: Some(1),
            name: name.into(),
            stream_url: url.map(String::from),
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::default();
        list.set_len(5);

        list.down();
        list.down();
        assert_eq!(list.selected, 2);

        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);

        list.up();
        assert_eq!(list.selected, 3);
    }

    #[test]
    fn test_list_state_set_len_clamps() {
        let mut list = ListState::default();
        list.set_len(10);
        list.selected = 8;

        list.set_len(5);
        assert_eq!(list.selected, 4);

        list.set_len(0);
        assert_eq!(list.selected, 0);
    }

    // -------------------------------------------------------------------------
    // SetupForm Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_setup_form_submit_valid() {
        let mut form = SetupForm::default();
        form.values[1] = "user".into();
        form.values[2] = "pass".into();
        form.values[3] = "http://provider.example".into();

        let cred = form.submit().expect("valid credential");
        assert_eq!(cred.username, "user");
        assert!(cred.playlist_name.is_none());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_setup_form_rejects_bad_url() {
        let mut form = SetupForm::default();
        form.values[1] = "user".into();
        form.values[2] = "pass".into();
        form.values[3] = "provider.example".into();

        assert!(form.submit().is_none());
        assert!(form.error.is_some());
    }

    #[test]
    fn test_setup_form_field_cycling() {
        let mut form = SetupForm::default();
        assert_eq!(form.focus, 0);
        form.prev_field();
        assert_eq!(form.focus, SETUP_FIELDS.len() - 1);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    // -------------------------------------------------------------------------
    // Banner Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_unplayable_item_raises_banner() {
        let mut app = App::new();
        app.screen = Screen::Browse;

        let show = ContentItem {
            series_id: Some(9),
            name: "Show".into(),
            ..Default::default()
        };
        let commands = app.play_item(show);
        assert!(commands.is_empty());
        assert!(app.banner.is_some());
        assert_eq!(app.screen, Screen::Browse);
    }

    #[test]
    fn test_banner_dismissed_on_keypress() {
        let mut app = App::new();
        app.screen = Screen::Browse;
        app.banner = Some("Playback failed".into());

        let commands = app.handle_key(
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::empty()),
            Instant::now(),
        );
        assert!(commands.is_empty());
        assert!(app.banner.is_none());
    }

    #[test]
    fn test_player_failure_keeps_browse_state() {
        let mut app = App::new();
        app.screen = Screen::Browse;
        app.cache.put(ContentType::Live, vec![item("ch", Some("http://s/1.m3u8"))]);
        app.browse.active_tab = ContentType::Live;

        let commands = app.play_selected();
        assert_eq!(commands.len(), 1);
        assert_eq!(app.screen, Screen::Playing);

        app.apply(Msg::Player(PlayerEvent::Failed("mpv not found".into())));
        assert_eq!(app.screen, Screen::Browse);
        assert!(app.banner.is_some());
        // Browse content untouched
        assert_eq!(app.cache.get(ContentType::Live).unwrap().len(), 1);
    }
}

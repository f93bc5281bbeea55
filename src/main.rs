use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cgmath::Vector2;
use chrono::Utc;
use iced::alignment::{Horizontal, Vertical};
use iced::event::{self, Event};
use iced::keyboard::{self, key::Named, Key, Modifiers};
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::widget::{button, canvas, column, container, pick_list, row, slider, stack, text, Column, Space};
use iced::{mouse, touch, window, Alignment, Element, Length, Point, Subscription, Task, Theme};
use rfd::FileDialog;

use drive_photos::drive::local::{LocalDrive, IMAGE_EXTENSIONS};
use drive_photos::geometry::{
    compute_render_geometry, FitMode, RenderGeometry, Size, VisiblePart, ZoomSlider, ZoomState,
};
use drive_photos::gesture::{
    PageTurn, PinchTracker, ScrollMetrics, SlideStep, Slideshow, Swipe, SwipeTracker, WheelPager,
};
use drive_photos::grid::{ActiveFollow, Debounced, FrameCoalescer, GridConfig, GridLayout};
use drive_photos::nav::{Applied, FetchResult, NavOutcome, Navigator, RecentFiles};
use drive_photos::preload::select_preload;
use drive_photos::storage::Storage;
use drive_photos::{Session, ViewerConfig};

// Declare the ui module
mod ui;

/// Height of the toolbar above the viewer
const TOOLBAR_HEIGHT: f64 = 48.0;
/// Width of the thumbnail column left of the viewer
const SIDEBAR_WIDTH: f64 = 240.0;
const WINDOW_SIZE: (f32, f32) = (1280.0, 800.0);

/// Main application state
struct DrivePhotos {
    config: ViewerConfig,
    /// Recent-files store; `None` when the database could not be opened
    storage: Option<Storage>,
    session: Session<LocalDrive>,

    zoom: ZoomState,
    geometry: RenderGeometry,
    /// Size of the image area
    viewer_size: Size,
    /// Scroll offset of the image area as last reported or requested
    viewer_scroll: Vector2<f64>,
    /// Id of the file the current geometry and scroll belong to
    shown_file: Option<String>,
    /// Keeps the thumbnail column on the active file
    follow: ActiveFollow,
    fullscreen: bool,

    grid: GridLayout,
    resize: Debounced<iced::Size>,
    grid_scroll: FrameCoalescer<f64>,

    wheel: WheelPager,
    swipe: SwipeTracker,
    pinch: PinchTracker,
    slideshow: Slideshow,
    modifiers: Modifiers,
    cursor: Point,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    // Session
    OpenDialog,
    OpenRecent(usize),
    SaveCopy,
    Saved(Result<PathBuf, String>),
    Fetched(Option<FetchResult>),
    Retry,
    Close,
    SignOut,

    // Navigation
    First,
    Prev,
    Next,
    Last,
    Select(String),
    ToggleSlideshow,
    SlideshowTick,
    ToggleFullscreen,

    // Viewer
    FitModeSelected(FitMode),
    ZoomSliderChanged(f64),
    ZoomMinus,
    ZoomPlus,
    ViewerScrolled(scrollable::Viewport),
    MinimapJump { left: f64, top: f64 },

    // Window and input
    GridScrolled(scrollable::Viewport),
    WindowResized(iced::Size),
    Frame(Instant),
    /// Wheel delta, positive scrolls down
    Wheel(f64),
    ModifiersChanged(Modifiers),
    CursorMoved(Point),
    Touch(touch::Event),
}

impl DrivePhotos {
    /// Create a new instance of the application
    ///
    /// An optional argument names the drive root, or an image to open right
    /// away (its grandparent folder becomes the root so sibling folders are
    /// reachable).
    fn new() -> (Self, Task<Message>) {
        let config = load_config();

        let storage = match Storage::open_default() {
            Ok(storage) => Some(storage),
            Err(e) => {
                log::warn!("Recent files disabled: {}", e);
                None
            }
        };
        let recent = storage
            .as_ref()
            .and_then(|s| {
                RecentFiles::load(s, config.recent_capacity)
                    .map_err(|e| log::warn!("Could not read recent files: {}", e))
                    .ok()
            })
            .unwrap_or_else(|| RecentFiles::new(config.recent_capacity));

        let (root, initial_file) = match std::env::args_os().nth(1).map(PathBuf::from) {
            Some(path) if path.is_file() => (root_for_file(&path), Some(path)),
            Some(path) => (path, None),
            None => (dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")), None),
        };
        log::info!("Drive root: {}", root.display());

        let session = Session::new(
            Arc::new(LocalDrive::new(root, config.page_size)),
            Navigator::new(recent),
            &config,
        );

        let mut app = DrivePhotos {
            zoom: ZoomState::new(config.zoom_step),
            geometry: RenderGeometry::default(),
            viewer_size: Size::ZERO,
            viewer_scroll: Vector2::new(0.0, 0.0),
            shown_file: None,
            follow: ActiveFollow::new(),
            fullscreen: false,
            grid: GridLayout::new(GridConfig::thumbnails(&config)),
            resize: Debounced::new(Duration::from_millis(config.resize_debounce_ms)),
            grid_scroll: FrameCoalescer::new(),
            wheel: WheelPager::new(config.wheel_count),
            swipe: SwipeTracker::new(config.swipe_threshold, config.swipe_edge_tolerance),
            pinch: PinchTracker::new(),
            slideshow: Slideshow::new(
                Duration::from_millis(config.slideshow_interval_ms),
                config.slideshow_overlap,
            ),
            modifiers: Modifiers::default(),
            cursor: Point::ORIGIN,
            config,
            storage,
            session,
        };
        app.apply_window_size(iced::Size::from(WINDOW_SIZE));

        let task = match initial_file {
            Some(path) => app.open_path(&path),
            None => Task::none(),
        };
        (app, task)
    }

    fn title(&self) -> String {
        let title = self.session.navigator().title();
        if title.is_empty() {
            "Drive Photos".to_string()
        } else {
            format!("{} - Drive Photos", title)
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenDialog => {
                let picked = FileDialog::new()
                    .set_title("Open Image")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .set_directory(self.session.client().root())
                    .pick_file();
                match picked {
                    Some(path) => self.open_path(&path),
                    None => Task::none(),
                }
            }
            Message::OpenRecent(index) => {
                let Some(file) = self.session.navigator().recent().files().get(index).cloned()
                else {
                    return Task::none();
                };
                self.session
                    .navigator_mut()
                    .open_file(&file.id, &file.parent_id);
                self.sync()
            }
            Message::SaveCopy => {
                let Some(file) = self.session.navigator().active_file() else {
                    return Task::none();
                };
                let source = PathBuf::from(&file.content_url);
                let picked = FileDialog::new()
                    .set_title("Save a Copy")
                    .set_file_name(file.name.as_str())
                    .save_file();
                match picked {
                    Some(target) => Task::perform(save_copy(source, target), Message::Saved),
                    None => Task::none(),
                }
            }
            Message::Saved(result) => {
                match result {
                    Ok(path) => log::info!("Saved a copy to {}", path.display()),
                    Err(e) => log::warn!("Could not save a copy: {}", e),
                }
                Task::none()
            }
            Message::Fetched(Some(result)) => {
                if let Applied::Failed(e) = self.session.apply(result) {
                    log::debug!("Fetch failed, retry available: {}", e);
                }
                self.sync()
            }
            Message::Fetched(None) => Task::none(),
            Message::Retry => {
                self.session.navigator_mut().retry();
                self.sync()
            }
            Message::Close => {
                self.session.close();
                self.slideshow.stop();
                self.sync()
            }
            Message::SignOut => {
                match &self.storage {
                    Some(storage) => {
                        if let Err(e) = self.session.sign_out(storage) {
                            log::warn!("Could not clear stored data: {}", e);
                        }
                    }
                    None => {
                        self.session.close();
                        self.session.navigator_mut().sign_out();
                    }
                }
                self.slideshow.stop();
                self.sync()
            }

            Message::First => self.navigate(Navigator::first),
            Message::Prev => self.navigate(Navigator::prev),
            Message::Next => self.navigate(Navigator::next),
            Message::Last => self.navigate(Navigator::last),
            Message::Select(id) => {
                // A clicked thumbnail is already on screen; keep the column still
                self.follow.smart_once();
                self.session.navigator_mut().select(&id);
                self.sync()
            }
            Message::ToggleSlideshow => {
                let enabled = self.session.navigator().flags().slideshow;
                self.slideshow.toggle(enabled);
                Task::none()
            }
            Message::SlideshowTick => {
                if !self.slideshow.is_playing() {
                    return Task::none();
                }
                match self.slideshow.step(self.viewer_metrics()) {
                    SlideStep::ScrollTo(y) => {
                        self.scroll_viewer(Vector2::new(self.viewer_scroll.x, y))
                    }
                    SlideStep::Next => self.navigate(Navigator::next),
                }
            }
            Message::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                let mode = if self.fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };
                window::get_latest().and_then(move |id| window::change_mode(id, mode))
            }

            Message::FitModeSelected(mode) => {
                self.zoom.set_fit_mode(mode);
                self.refit();
                self.scroll_viewer(Vector2::new(0.0, 0.0))
            }
            Message::ZoomSliderChanged(value) => {
                self.zoom.slider_mut().set_value(value);
                self.manual_zoom()
            }
            Message::ZoomMinus => {
                self.zoom.slider_mut().minus();
                self.manual_zoom()
            }
            Message::ZoomPlus => {
                self.zoom.slider_mut().plus();
                self.manual_zoom()
            }
            Message::ViewerScrolled(viewport) => {
                let offset = viewport.absolute_offset();
                self.viewer_scroll = Vector2::new(offset.x as f64, offset.y as f64);
                Task::none()
            }
            Message::MinimapJump { left, top } => {
                let content = Size::new(self.geometry.render_width, self.geometry.render_height);
                self.scroll_viewer(VisiblePart::scroll_visible_to(left, top, content))
            }

            Message::GridScrolled(viewport) => {
                self.grid_scroll.push(viewport.absolute_offset().y as f64);
                Task::none()
            }
            Message::WindowResized(size) => {
                self.resize.push(size, Instant::now());
                Task::none()
            }
            Message::Frame(now) => {
                if let Some(size) = self.resize.poll(now) {
                    self.apply_window_size(size);
                }
                if let Some(offset) = self.grid_scroll.take() {
                    self.grid.set_scroll_offset(offset);
                    if let Some(rows) = self.grid.take_visible_rows_change() {
                        log::trace!("Thumbnail rows {}..={} visible", rows.start(), rows.end());
                    }
                }
                Task::none()
            }
            Message::Wheel(delta_y) => self.on_wheel(delta_y),
            Message::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
                Task::none()
            }
            Message::CursorMoved(position) => {
                self.cursor = position;
                Task::none()
            }
            Message::Touch(event) => self.on_touch(event),
        }
    }

    // ========== Session plumbing ==========

    /// Open a picked image, re-rooting the drive if it lies outside the current root
    fn open_path(&mut self, path: &Path) -> Task<Message> {
        if self.session.client().id_for_path(path).is_none() {
            let root = root_for_file(path);
            log::info!("Switching drive root to {}", root.display());
            self.session.close();
            let recent = self.session.navigator().recent().clone();
            self.session = Session::new(
                Arc::new(LocalDrive::new(root, self.config.page_size)),
                Navigator::new(recent),
                &self.config,
            );
        }

        match self.session.client().record_for_path(path) {
            Ok(file) => {
                self.session
                    .navigator_mut()
                    .open_file(&file.id, &file.parent_id);
                self.sync()
            }
            Err(e) => {
                log::warn!("Cannot open {}: {}", path.display(), e);
                Task::none()
            }
        }
    }

    fn navigate(&mut self, step: fn(&mut Navigator) -> NavOutcome) -> Task<Message> {
        let outcome = step(self.session.navigator_mut());
        log::debug!("Navigation: {:?}", outcome);
        self.sync()
    }

    /// Bring everything derived from the navigator up to date and launch the
    /// fetches it asked for
    fn sync(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();

        self.grid.set_item_count(self.session.navigator().files().len());

        let active = self.session.navigator().active_file().map(|f| f.id.clone());
        if active != self.shown_file {
            self.shown_file = active;
            tasks.push(self.show_active());
        }

        // The index can arrive after the file itself, with the listing
        let index = self.session.navigator().active_index();
        if let Some(offset) = self.follow.follow(&mut self.grid, index) {
            tasks.push(scrollable::scroll_to(
                ui::thumbnails::grid_id(),
                AbsoluteOffset {
                    x: 0.0,
                    y: offset as f32,
                },
            ));
        }

        let flags = self.session.navigator().flags();
        self.slideshow.sync(flags.slideshow);

        if let Some(storage) = &self.storage {
            if let Err(e) = self.session.persist_recent(storage) {
                log::warn!("Could not save recent files: {}", e);
            }
        }

        tasks.extend(
            self.session
                .take_jobs()
                .into_iter()
                .map(|job| Task::perform(job, Message::Fetched)),
        );
        Task::batch(tasks)
    }

    /// A different file became active: refit it and reset the viewer scroll
    fn show_active(&mut self) -> Task<Message> {
        self.wheel.reset();
        self.swipe.cancel();

        let Some(file) = self.session.navigator().active_file() else {
            self.geometry = RenderGeometry::default();
            return Task::none();
        };

        // A vanished local file is what an expired link is for a remote drive
        if !Path::new(&file.content_url).exists() {
            self.session.on_image_error(Utc::now());
        }

        self.refit();
        let y = if self.session.navigator().scroll_to_bottom() {
            self.viewer_metrics().max_offset().max(0.0)
        } else {
            0.0
        };
        self.scroll_viewer(Vector2::new(0.0, y))
    }

    // ========== Geometry ==========

    fn apply_window_size(&mut self, size: iced::Size) {
        let body_height = (size.height as f64 - TOOLBAR_HEIGHT).max(0.0);
        self.viewer_size = Size::new((size.width as f64 - SIDEBAR_WIDTH).max(0.0), body_height);
        self.grid.set_container(Size::new(SIDEBAR_WIDTH, body_height));
        self.refit();
    }

    /// Recompute the fit scale for the active file and the current container
    fn refit(&mut self) {
        let natural = self
            .session
            .navigator()
            .active_file()
            .and_then(|f| f.natural_size());
        match natural {
            Some(natural) => {
                self.zoom
                    .refit(natural, self.viewer_size, ui::viewer::SCROLLBAR_WIDTH);
                self.relayout();
            }
            None => self.geometry = RenderGeometry::default(),
        }
    }

    /// Recompute render geometry at the current zoom scale
    fn relayout(&mut self) {
        let natural = self
            .session
            .navigator()
            .active_file()
            .and_then(|f| f.natural_size())
            .unwrap_or(Size::ZERO);
        self.geometry = compute_render_geometry(
            natural,
            self.zoom.scale(),
            self.viewer_size,
            ui::viewer::SCROLLBAR_WIDTH,
        );
    }

    fn manual_zoom(&mut self) -> Task<Message> {
        self.zoom.set_fit_mode(FitMode::Manual);
        self.refit();
        Task::none()
    }

    /// Vertical scroll state of the image area
    fn viewer_metrics(&self) -> ScrollMetrics {
        let viewport = if self.geometry.horizontal_scroll {
            self.viewer_size.height - ui::viewer::SCROLLBAR_WIDTH
        } else {
            self.viewer_size.height
        };
        ScrollMetrics {
            offset: self.viewer_scroll.y,
            content: (self.geometry.render_height + self.geometry.center_offset_top).max(viewport),
            viewport,
        }
    }

    fn max_scroll_left(&self) -> f64 {
        let client = if self.geometry.vertical_scroll {
            self.viewer_size.width - ui::viewer::SCROLLBAR_WIDTH
        } else {
            self.viewer_size.width
        };
        (self.geometry.render_width - client).max(0.0)
    }

    fn scroll_viewer(&mut self, offset: Vector2<f64>) -> Task<Message> {
        self.viewer_scroll = offset;
        scrollable::scroll_to(
            ui::viewer::viewer_id(),
            AbsoluteOffset {
                x: offset.x as f32,
                y: offset.y as f32,
            },
        )
    }

    /// Position relative to the top-left corner of the image area
    fn viewer_point(&self, position: Point) -> Option<Vector2<f64>> {
        let point = Vector2::new(
            position.x as f64 - SIDEBAR_WIDTH,
            position.y as f64 - TOOLBAR_HEIGHT,
        );
        let inside = point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.viewer_size.width
            && point.y < self.viewer_size.height;
        inside.then_some(point)
    }

    /// Anchor for zooming: the pointer in image pixels
    fn image_point(&self, viewer_point: Vector2<f64>) -> Vector2<f64> {
        viewer_point
            - Vector2::new(
                self.geometry.center_offset_left,
                self.geometry.center_offset_top,
            )
            + self.viewer_scroll
    }

    // ========== Input ==========

    fn on_wheel(&mut self, delta_y: f64) -> Task<Message> {
        let Some(point) = self.viewer_point(self.cursor) else {
            return Task::none();
        };

        if self.modifiers.control() {
            let anchor = self.image_point(point);
            if self.zoom.wheel_zoom(-delta_y, anchor, self.viewer_scroll) {
                return self.apply_zoom_anchor();
            }
            return Task::none();
        }

        let turn = self.wheel.on_wheel(
            delta_y,
            self.viewer_metrics(),
            self.geometry.is_overflow(),
            self.modifiers.shift(),
            false,
        );
        match turn {
            Some(PageTurn::Next) => self.navigate(Navigator::next),
            Some(PageTurn::Prev) => self.navigate(Navigator::prev),
            None => Task::none(),
        }
    }

    fn on_touch(&mut self, event: touch::Event) -> Task<Message> {
        match event {
            touch::Event::FingerPressed { id, position } => {
                let point = Vector2::new(position.x as f64, position.y as f64);
                self.swipe
                    .finger_pressed(id.0, point, self.viewer_scroll.x, self.max_scroll_left());
                self.pinch.pointer_down(id.0, point);
                Task::none()
            }
            touch::Event::FingerMoved { id, position } => {
                let point = Vector2::new(position.x as f64, position.y as f64);
                let Some(step) = self.pinch.pointer_move(id.0, point) else {
                    return Task::none();
                };
                let Some(midpoint) = self.viewer_point(Point::new(
                    step.midpoint.x as f32,
                    step.midpoint.y as f32,
                )) else {
                    return Task::none();
                };
                let anchor = self.image_point(midpoint);
                if self.zoom.pinch_zoom(step.ratio, anchor, self.viewer_scroll) {
                    self.apply_zoom_anchor()
                } else {
                    Task::none()
                }
            }
            touch::Event::FingerLifted { id, position } => {
                self.pinch.pointer_up(id.0);
                let point = Vector2::new(position.x as f64, position.y as f64);
                match self.swipe.finger_lifted(id.0, point) {
                    Some(Swipe::Left) => self.navigate(Navigator::next),
                    Some(Swipe::Right) => self.navigate(Navigator::prev),
                    None => Task::none(),
                }
            }
            touch::Event::FingerLost { id, .. } => {
                self.pinch.pointer_up(id.0);
                self.swipe.cancel();
                Task::none()
            }
        }
    }

    /// Re-layout after a wheel or pinch zoom and keep the anchor under the pointer
    fn apply_zoom_anchor(&mut self) -> Task<Message> {
        self.relayout();
        match self.zoom.take_fixed_point_scroll() {
            Some(scroll) => {
                let scroll = Vector2::new(scroll.x.max(0.0), scroll.y.max(0.0));
                self.scroll_viewer(scroll)
            }
            None => Task::none(),
        }
    }

    // ========== View ==========

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let nav = self.session.navigator();

        let body: Element<Message> = match nav.active_file() {
            Some(file) => {
                let files = nav.files();
                let preload = select_preload(
                    files,
                    nav.active_index(),
                    self.config.preload_count,
                    &self.grid.visible_indices(),
                );

                let sidebar = container(ui::thumbnails::view(files, nav.active_index(), &self.grid))
                    .width(Length::Fixed(SIDEBAR_WIDTH as f32))
                    .height(Length::Fill);

                let mut viewer = stack![ui::viewer::view(file, &self.geometry)];
                if self.geometry.horizontal_scroll || self.geometry.vertical_scroll {
                    let part = VisiblePart::compute(
                        self.viewer_size,
                        Size::new(self.geometry.render_width, self.geometry.render_height),
                        self.viewer_scroll,
                    );
                    viewer = viewer.push(
                        container(
                            canvas(ui::minimap::Minimap { part })
                                .width(Length::Fixed(120.0))
                                .height(Length::Fixed(90.0)),
                        )
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .align_x(Horizontal::Right)
                        .align_y(Vertical::Bottom)
                        .padding(16),
                    );
                }

                column![
                    row![sidebar, viewer.width(Length::Fill).height(Length::Fill)],
                    ui::viewer::preload_strip(&preload),
                ]
                .into()
            }
            None => self.welcome(),
        };

        column![
            container(self.toolbar()).height(Length::Fixed(TOOLBAR_HEIGHT as f32)),
            body,
        ]
        .into()
    }

    fn toolbar(&self) -> Element<Message> {
        let nav = self.session.navigator();
        let flags = nav.flags();

        let nav_button = |label: &'static str, enabled: bool, message: Message| {
            button(text(label)).on_press_maybe(enabled.then_some(message))
        };

        let slideshow_label = if self.slideshow.is_playing() {
            "Stop"
        } else {
            "Slideshow"
        };

        let mut bar = row![button(text("Open")).on_press(Message::OpenDialog)]
            .spacing(8)
            .padding(8)
            .align_y(Alignment::Center);

        if nav.is_open() && !nav.recent().is_empty() {
            let choices: Vec<RecentChoice> = nav
                .recent()
                .files()
                .iter()
                .enumerate()
                .map(|(index, file)| RecentChoice {
                    index,
                    title: file.title.clone(),
                })
                .collect();
            bar = bar.push(
                pick_list(choices, None::<RecentChoice>, |choice| {
                    Message::OpenRecent(choice.index)
                })
                .placeholder("Recent"),
            );
        }

        bar = bar
            .push(nav_button("|<", flags.first, Message::First))
            .push(nav_button("<", flags.prev, Message::Prev))
            .push(text(nav.counter_text()))
            .push(nav_button(">", flags.next, Message::Next))
            .push(nav_button(">|", flags.last, Message::Last))
            .push(nav_button(slideshow_label, flags.slideshow, Message::ToggleSlideshow))
            .push(pick_list(
                &FitMode::ALL[..],
                Some(self.zoom.fit_mode()),
                Message::FitModeSelected,
            ));

        if self.zoom.fit_mode() == FitMode::Manual {
            bar = bar.push(
                row![
                    button(text("-")).on_press(Message::ZoomMinus),
                    slider(
                        ZoomSlider::MIN..=ZoomSlider::MAX,
                        self.zoom.slider().value(),
                        Message::ZoomSliderChanged
                    )
                    .step(ZoomSlider::STEP)
                    .width(Length::Fixed(160.0)),
                    button(text("+")).on_press(Message::ZoomPlus),
                    text(format!("{}%", self.zoom.slider().zoom())),
                ]
                .spacing(4)
                .align_y(Alignment::Center),
            );
        }

        if let Some(error) = nav.last_error() {
            bar = bar.push(text(format!("Error: {}", error)));
        }
        if nav.has_failed_requests() {
            bar = bar.push(button(text("Retry")).on_press(Message::Retry));
        }

        bar = bar.push(Space::with_width(Length::Fill));
        bar = bar.push(button(text("Fullscreen")).on_press(Message::ToggleFullscreen));
        if nav.is_open() {
            bar = bar.push(
                button(text("Save a Copy")).on_press_maybe(nav.active_file().map(|_| Message::SaveCopy)),
            );
            bar = bar.push(button(text("Close")).on_press(Message::Close));
        }
        bar.push(button(text("Sign out")).on_press(Message::SignOut))
            .into()
    }

    /// Recent files, shown while nothing is open
    fn welcome(&self) -> Element<Message> {
        let recent = self.session.navigator().recent();
        let mut list = Column::new().spacing(8).align_x(Alignment::Center);

        if recent.is_empty() {
            list = list.push(text("Open an image to start browsing").size(20));
        } else {
            list = list.push(text("Recent").size(24));
            for (index, file) in recent.files().iter().enumerate() {
                list = list.push(
                    button(text(file.title.as_str()))
                        .on_press(Message::OpenRecent(index))
                        .padding(8),
                );
            }
        }

        container(list)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![
            event::listen_with(on_event),
            keyboard::on_key_press(on_key),
        ];
        if self.resize.is_pending() || self.grid_scroll.is_pending() {
            subs.push(window::frames().map(Message::Frame));
        }
        if self.slideshow.is_playing() {
            subs.push(iced::time::every(self.slideshow.interval()).map(|_| Message::SlideshowTick));
        }
        Subscription::batch(subs)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn on_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
        Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
            let y = match delta {
                mouse::ScrollDelta::Lines { y, .. } => y,
                mouse::ScrollDelta::Pixels { y, .. } => y,
            };
            // iced reports scrolling up as positive
            Some(Message::Wheel(-y as f64))
        }
        Event::Mouse(mouse::Event::CursorMoved { position }) => Some(Message::CursorMoved(position)),
        Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
            Some(Message::ModifiersChanged(modifiers))
        }
        Event::Touch(finger) => Some(Message::Touch(finger)),
        _ => None,
    }
}

fn on_key(key: Key, _modifiers: Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(Named::Home) => Some(Message::First),
        Key::Named(Named::ArrowLeft) => Some(Message::Prev),
        Key::Named(Named::ArrowRight) => Some(Message::Next),
        Key::Named(Named::End) => Some(Message::Last),
        Key::Named(Named::Space) => Some(Message::ToggleSlideshow),
        Key::Named(Named::F11) => Some(Message::ToggleFullscreen),
        _ => None,
    }
}

/// Entry of the toolbar's recent-files menu
#[derive(Debug, Clone, PartialEq)]
struct RecentChoice {
    index: usize,
    title: String,
}

impl fmt::Display for RecentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Copy the original file of the active image to `target`
async fn save_copy(source: PathBuf, target: PathBuf) -> Result<PathBuf, String> {
    tokio::fs::copy(&source, &target)
        .await
        .map(|_| target)
        .map_err(|e| e.to_string())
}

/// Drive root for an image opened directly: two levels up, so the folders
/// next to the image's own folder are part of the drive
fn root_for_file(path: &Path) -> PathBuf {
    let folder = path.parent();
    folder
        .and_then(Path::parent)
        .or(folder)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

fn load_config() -> ViewerConfig {
    let Some(path) = ViewerConfig::default_path() else {
        return ViewerConfig::default();
    };
    match ViewerConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            ViewerConfig::default()
        }
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application(DrivePhotos::title, DrivePhotos::update, DrivePhotos::view)
        .subscription(DrivePhotos::subscription)
        .theme(DrivePhotos::theme)
        .window_size(WINDOW_SIZE)
        .centered()
        .run_with(DrivePhotos::new)
}

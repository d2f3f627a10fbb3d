use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::chart;
use crate::gui::icon::IconCache;
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringchart::{CategoryId, ChartEvent, DonutChart, MotionMode, Point, SegmentLabel};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub chart: Rc<RefCell<DonutChart>>,
    pub icons: Rc<RefCell<IconCache>>,
    pub visible: bool,
    pub title: String,
    pub motion: MotionMode,
    pub last_tick: Instant,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Tap(Point),
    Step(isize),
    Resize(i32, i32),
    Tick,
    Select(CategoryId),
    Motion(MotionMode),
    SystemMotionChanged,
    ConfigReload,
    Announce,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Select(id) => AppMsg::Select(id),
            AppEvent::Motion(mode) => AppMsg::Motion(mode),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        async_channel::Sender<AppEvent>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            #[watch]
            set_title: Some(&model.title),
            #[watch]
            set_visible: model.visible,
            set_default_size: (side, side),
            add_css_class: "budgetring-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Escape => sender.input(AppMsg::Hide),
                        gtk::gdk::Key::Right | gtk::gdk::Key::Down => sender.input(AppMsg::Step(1)),
                        gtk::gdk::Key::Left | gtk::gdk::Key::Up => sender.input(AppMsg::Step(-1)),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_focusable: true,
                add_css_class: "budgetring-chart",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureClick {
                    set_button: gtk::gdk::BUTTON_PRIMARY,
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Tap(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, _tx, rx) = init;

        theme::load_css();

        let options = config.chart_options(theme::system_prefers_reduced_motion);
        let side = options.size.round() as i32;
        let mut chart = DonutChart::new(config.categories(), None, options, config.currency.clone());

        {
            let sender = sender.clone();
            chart.subscribe(move |event| match event {
                ChartEvent::SelectionChanged(category) => {
                    log::debug!("Selected '{}'", category.id());
                    sender.input(AppMsg::Announce);
                }
                ChartEvent::CategoriesReplaced {
                    previous_count,
                    count,
                } => {
                    log::info!("Chart now has {} categories (was {})", count, previous_count);
                    sender.input(AppMsg::Announce);
                }
            });
        }

        let model = AppModel {
            title: chart.center_label().to_string(),
            chart: Rc::new(RefCell::new(chart)),
            icons: Rc::new(RefCell::new(IconCache::default())),
            visible: true,
            motion: config.chart.reduced_motion,
            last_tick: Instant::now(),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let chart_draw = model.chart.clone();
        let icons_draw = model.icons.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let (_, origin) = chart::square_origin(width as f64, height as f64);
                if let Err(e) = chart::draw(
                    cr,
                    &chart_draw.borrow(),
                    origin,
                    &colors,
                    &mut icons_draw.borrow_mut(),
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        if let Some(settings) = gtk::Settings::default() {
            let sender = sender.clone();
            settings.connect_gtk_enable_animations_notify(move |_| {
                sender.input(AppMsg::SystemMotionChanged);
            });
        }

        {
            let sender = sender.clone();
            glib::timeout_add_local(chart::FRAME_INTERVAL, move || {
                sender.input(AppMsg::Tick);
                glib::ControlFlow::Continue
            });
        }

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.announce();
        widgets.drawing_area.grab_focus();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
                self.last_tick = Instant::now();
                self.root.present();
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.visible = false;
            }
            AppMsg::Tap(point) => {
                if !self.visible {
                    return;
                }
                let (_, origin) = chart::square_origin(
                    self.drawing_area.width() as f64,
                    self.drawing_area.height() as f64,
                );
                let local = Point::new(point.x - origin.x, point.y - origin.y);
                if self.chart.borrow_mut().tap(local) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Step(delta) => {
                let next = {
                    let chart = self.chart.borrow();
                    let count = chart.categories().len() as isize;
                    chart
                        .selection()
                        .index()
                        .filter(|_| count > 0)
                        .map(|i| (i as isize + delta).rem_euclid(count) as usize)
                        .map(|i| chart.categories()[i].id().clone())
                };
                if let Some(id) = next {
                    self.select(&id);
                }
            }
            AppMsg::Resize(width, height) => {
                let (side, _) = chart::square_origin(width as f64, height as f64);
                self.chart.borrow_mut().set_size(side);
                self.drawing_area.queue_draw();
            }
            AppMsg::Tick => {
                let now = Instant::now();
                let dt = now
                    .duration_since(self.last_tick)
                    .min(chart::MAX_FRAME_DELTA);
                self.last_tick = now;

                if !self.visible {
                    return;
                }
                let mut chart = self.chart.borrow_mut();
                if chart.is_animating() {
                    chart.tick(dt);
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Select(id) => self.select(&id),
            AppMsg::Motion(mode) => {
                self.motion = mode;
                self.apply_motion();
            }
            AppMsg::SystemMotionChanged => {
                if self.motion == MotionMode::System {
                    self.apply_motion();
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.apply_config(&new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Announce => self.announce(),
        }
    }
}

impl AppModel {
    fn select(&mut self, id: &CategoryId) {
        if self.chart.borrow_mut().select(id) {
            self.drawing_area.queue_draw();
        } else {
            log::debug!("Selection of '{}' ignored", id);
        }
    }

    fn apply_motion(&mut self) {
        let reduced = self
            .motion
            .reduced_motion(theme::system_prefers_reduced_motion);
        log::info!("Motion mode {} (reduced motion: {})", self.motion, reduced);
        self.chart.borrow_mut().set_reduced_motion(reduced);
    }

    fn apply_config(&mut self, config: &Config) {
        self.motion = config.chart.reduced_motion;
        self.apply_motion();
        self.icons.borrow_mut().clear();

        let mut chart = self.chart.borrow_mut();
        chart.set_formatter(config.currency.clone());
        chart.set_alignment_angle(config.chart.alignment.angle());
        chart.replace_categories(config.categories());
        drop(chart);

        self.announce();
        self.drawing_area.queue_draw();
    }

    /// Mirrors the chart's spoken labels onto the window title and the
    /// drawing area's accessible properties.
    fn announce(&mut self) {
        let chart = self.chart.borrow();
        let description = accessible_description(chart.labels());

        self.title = chart.center_label().to_string();
        self.drawing_area.update_property(&[
            gtk::accessible::Property::Label(chart.center_label()),
            gtk::accessible::Property::Description(&description),
        ]);
    }
}

/// Every segment label in ring order, with the selected one marked.
fn accessible_description(labels: &[SegmentLabel]) -> String {
    labels
        .iter()
        .map(|label| {
            if label.selected {
                format!("{} (selected)", label.text)
            } else {
                label.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

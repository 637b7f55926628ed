use crate::config::Config;
use crate::events::AppEvent;
use crate::gui::roster::{RankSection, ScrollChips, rank_add_row};
use crate::gui::theme::{self, WheelColors};
use crate::gui::wheel::{self as wheel_view, to_wheel_space};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use shinobi::roster::{
    BatchSelection, NinjaName, Rank, Roster, ScrollList, ScrollName, SearchResult,
};
use shinobi::store::{Store, StoreError};
use shinobi::wheel::{MIN_SIDE, Point, SpinOutcome, Wheel};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

const DELETE_BUTTONS: [&str; 2] = ["No", "Yes"];
const DELETE_NO: i32 = 0;
const DELETE_YES: i32 = 1;

fn delete_prompt(count: usize) -> String {
    format!("Delete the {} selected ninja(s)?", count)
}

/// Only an explicit "Yes" deletes; closing the dialog counts as "No".
fn is_confirmed(choice: &Result<i32, glib::Error>) -> bool {
    matches!(choice, Ok(DELETE_YES))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Warning,
    Success,
}

impl Tone {
    fn css_class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
}

impl Notice {
    fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Warning,
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }
}

pub struct AppModel {
    pub root: gtk::ApplicationWindow,
    pub store: Store,
    pub roster: Roster,
    pub scrolls: ScrollList,
    pub selections: HashMap<Rank, BatchSelection>,
    pub batch_mode_default: bool,
    pub wheel: Rc<RefCell<Wheel>>,
    pub spinning: bool,
    pub landed: Option<String>,
    pub notice: Option<Notice>,
    pub search_entry: gtk::Entry,
    pub scroll_entry: gtk::Entry,
    pub rules_view: gtk::TextView,
    pub rules_buffer: gtk::TextBuffer,
    pub drawing_area: gtk::DrawingArea,
    pub sections: Vec<(Rank, RankSection)>,
    pub chips: ScrollChips,
}

#[derive(Debug, Clone)]
pub enum AppMsg {
    Search,
    ClearSearch,
    QuickAdd(Rank),
    BatchAdd(Rank),
    RemoveNinja(NinjaName),
    ToggleBatch(Rank),
    ToggleSelectAll(Rank),
    CheckNinja(Rank, NinjaName, bool),
    DeleteSelected(Rank),
    ConfirmDelete(Rank, Vec<NinjaName>),
    AddScroll,
    RemoveScroll(ScrollName),
    RulesChanged,
    Spin,
    Landed(SpinOutcome),
    Hover(Option<Point>),
    Resize(i32, i32),
    DataChanged(PathBuf),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::DataChanged(path) => AppMsg::DataChanged(path),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, Store, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Dojo"),
            set_default_size: (width, height),
            set_size_request: (min_width, min_height),

            #[wrap(Some)]
            set_child = &gtk::Paned {
                set_orientation: gtk::Orientation::Horizontal,
                set_position: 380,

                #[wrap(Some)]
                set_start_child = &gtk::ScrolledWindow {
                    set_hscrollbar_policy: gtk::PolicyType::Never,

                    #[wrap(Some)]
                    set_child = &gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 16,
                        add_css_class: "dojo-panel",

                        gtk::Label {
                            set_label: "Rules",
                            set_xalign: 0.0,
                            add_css_class: "section-title",
                        },

                        #[name = "rules_view"]
                        gtk::TextView {
                            set_wrap_mode: gtk::WrapMode::WordChar,
                            set_height_request: 100,
                            add_css_class: "rules",
                        },

                        gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_spacing: 6,

                            #[name = "search_entry"]
                            gtk::Entry {
                                set_hexpand: true,
                                set_placeholder_text: Some("Ninja name..."),
                                connect_activate[sender] => move |_| {
                                    sender.input(AppMsg::Search);
                                },
                            },

                            gtk::Button {
                                set_label: "Search",
                                connect_clicked[sender] => move |_| {
                                    sender.input(AppMsg::Search);
                                },
                            },

                            gtk::Button {
                                set_label: "Clear",
                                connect_clicked[sender] => move |_| {
                                    sender.input(AppMsg::ClearSearch);
                                },
                            },
                        },

                        gtk::Label {
                            set_wrap: true,
                            set_xalign: 0.0,
                            #[watch]
                            set_visible: model.notice.is_some(),
                            #[watch]
                            set_label: model.notice.as_ref().map_or("", |n| n.text.as_str()),
                            #[watch]
                            set_css_classes: &[
                                "notice",
                                model.notice.as_ref().map_or("info", |n| n.tone.css_class()),
                            ],
                        },

                        gtk::Label {
                            set_label: "Ranks",
                            set_xalign: 0.0,
                            add_css_class: "section-title",
                        },

                        #[name = "rank_rows"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 8,
                        },

                        gtk::Label {
                            set_label: "Wheel",
                            set_xalign: 0.0,
                            add_css_class: "section-title",
                        },

                        gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_spacing: 6,

                            #[name = "scroll_entry"]
                            gtk::Entry {
                                set_hexpand: true,
                                set_placeholder_text: Some("Scroll name..."),
                                connect_activate[sender] => move |_| {
                                    sender.input(AppMsg::AddScroll);
                                },
                            },

                            gtk::Button {
                                set_label: "Add",
                                connect_clicked[sender] => move |_| {
                                    sender.input(AppMsg::AddScroll);
                                },
                            },
                        },

                        #[name = "chips_slot"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                        },

                        #[name = "wheel_slot"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            #[watch]
                            set_visible: !model.scrolls.is_empty(),
                        },

                        gtk::Button {
                            set_label: "Spin",
                            add_css_class: "suggested-action",
                            #[watch]
                            set_visible: !model.scrolls.is_empty(),
                            #[watch]
                            set_sensitive: !model.spinning,
                            connect_clicked[sender] => move |_| {
                                sender.input(AppMsg::Spin);
                            },
                        },

                        gtk::Label {
                            add_css_class: "landed",
                            #[watch]
                            set_visible: model.landed.is_some(),
                            #[watch]
                            set_label: &model
                                .landed
                                .as_ref()
                                .map(|label| format!("Landed on: {}", label))
                                .unwrap_or_default(),
                        },
                    },
                },

                #[wrap(Some)]
                set_end_child = &gtk::ScrolledWindow {
                    set_hscrollbar_policy: gtk::PolicyType::Never,

                    #[wrap(Some)]
                    set_child = &gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        add_css_class: "dojo-panel",

                        #[name = "sections_box"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 16,
                        },
                    },
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, store, rx) = init;

        theme::load_css();

        let roster = store.load_roster();
        let scrolls = store.load_scrolls();
        let selections = Rank::all()
            .map(|rank| {
                let mut selection = BatchSelection::default();
                if config.batch_mode_on_start {
                    selection.enter();
                }
                (rank, selection)
            })
            .collect();

        let mut wheel = Wheel::new();
        wheel.set_segments(scrolls.labels());

        let model = AppModel {
            root: root.clone(),
            store,
            roster,
            scrolls,
            selections,
            batch_mode_default: config.batch_mode_on_start,
            wheel: Rc::new(RefCell::new(wheel)),
            spinning: false,
            landed: None,
            notice: None,
            search_entry: gtk::Entry::default(),
            scroll_entry: gtk::Entry::default(),
            rules_view: gtk::TextView::default(),
            rules_buffer: gtk::TextBuffer::new(None),
            drawing_area: gtk::DrawingArea::default(),
            sections: Vec::new(),
            chips: ScrollChips::new(),
        };

        let (width, height) = (config.window.width, config.window.height);
        let (min_width, min_height) = config.window.size_request();
        let widgets = view_output!();

        let mut model = model;
        model.search_entry = widgets.search_entry.clone();
        model.scroll_entry = widgets.scroll_entry.clone();
        model.rules_view = widgets.rules_view.clone();
        model.rules_buffer = widgets.rules_view.buffer();

        model.rules_buffer.set_text(&model.store.load_rules());
        {
            let sender = sender.clone();
            model
                .rules_buffer
                .connect_changed(move |_| sender.input(AppMsg::RulesChanged));
        }

        for rank in Rank::all() {
            widgets.rank_rows.append(&rank_add_row(rank, &sender));

            let section = RankSection::new(rank, &sender);
            widgets.sections_box.append(&section.root);
            model.sections.push((rank, section));
        }
        widgets.chips_slot.append(&model.chips.root);

        model.drawing_area = build_wheel_area(&model.wheel, &sender);
        let frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
        frame.set_child(Some(&model.drawing_area));
        widgets.wheel_slot.append(&frame);

        model.refresh_sections(&sender);
        model.chips.refresh(model.scrolls.items(), &sender);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Search => {
                let text = self.search_entry.text();
                self.notice = match self.roster.search(&text) {
                    SearchResult::Empty => None,
                    found @ SearchResult::Banned(_) => Some(Notice::warning(found.to_string())),
                    clear @ SearchResult::Clear(_) => Some(Notice::success(clear.to_string())),
                };
            }
            AppMsg::ClearSearch => {
                self.search_entry.set_text("");
                self.notice = None;
            }
            AppMsg::QuickAdd(rank) => {
                let text = self.search_entry.text().to_string();
                match self
                    .store
                    .update_roster(|r| r.add(&text, rank))
                {
                    Ok((roster, Ok(name))) => {
                        self.roster = roster;
                        self.search_entry.set_text("");
                        self.notice = Some(Notice::success(format!(
                            "Banned {} at rank {}",
                            name, rank
                        )));
                        self.refresh_sections(&sender);
                    }
                    Ok((_, Err(e))) => self.notice = Some(Notice::warning(e.to_string())),
                    Err(e) => self.report_store_error(e),
                }
            }
            AppMsg::BatchAdd(rank) => {
                let text = self.search_entry.text().to_string();
                match self.store.update_roster(|r| r.add_batch(&text, rank)) {
                    Ok((roster, Ok(report))) => {
                        self.roster = roster;
                        self.notice = Some(if report.added > 0 {
                            self.search_entry.set_text("");
                            Notice::success(report.to_string())
                        } else {
                            Notice::warning(report.to_string())
                        });
                        self.refresh_sections(&sender);
                    }
                    Ok((_, Err(e))) => self.notice = Some(Notice::warning(e.to_string())),
                    Err(e) => self.report_store_error(e),
                }
            }
            AppMsg::RemoveNinja(name) => {
                match self.store.update_roster(|r| r.remove(name.as_str())) {
                    Ok((roster, _)) => {
                        self.roster = roster;
                        self.refresh_sections(&sender);
                    }
                    Err(e) => self.report_store_error(e),
                }
            }
            AppMsg::ToggleBatch(rank) => {
                self.selections.entry(rank).or_default().enter();
                self.refresh_sections(&sender);
            }
            AppMsg::ToggleSelectAll(rank) => {
                let names = self.roster.by_rank(rank).map(|n| &n.name);
                self.selections.entry(rank).or_default().toggle_all(names);
                self.refresh_sections(&sender);
            }
            AppMsg::CheckNinja(rank, name, checked) => {
                let selection = self.selections.entry(rank).or_default();
                let was_all = selection.is_all_selected();
                selection.set_checked(name, checked);
                if was_all != selection.is_all_selected() {
                    self.refresh_sections(&sender);
                }
            }
            AppMsg::DeleteSelected(rank) => {
                let selection = self.selections.entry(rank).or_default();
                let count = selection.selected_count();
                let doomed = selection.take();
                if self.batch_mode_default {
                    selection.enter();
                }
                self.refresh_sections(&sender);

                if count > 0 {
                    self.confirm_delete(rank, doomed, &sender);
                }
            }
            AppMsg::ConfirmDelete(rank, doomed) => {
                match self.store.update_roster(|r| r.remove_many(&doomed)) {
                    Ok((roster, removed)) => {
                        self.roster = roster;
                        self.notice = Some(Notice::success(format!(
                            "Removed {} ninja(s) from rank {}",
                            removed, rank
                        )));
                        self.refresh_sections(&sender);
                    }
                    Err(e) => self.report_store_error(e),
                }
            }
            AppMsg::AddScroll => {
                let text = self.scroll_entry.text().to_string();
                match self.store.update_scrolls(|s| s.add(&text)) {
                    Ok(scrolls) => {
                        self.scroll_entry.set_text("");
                        self.apply_scrolls(scrolls, &sender);
                    }
                    Err(e) => self.report_store_error(e),
                }
            }
            AppMsg::RemoveScroll(name) => {
                match self.store.update_scrolls(|s| s.remove(name.as_str())) {
                    Ok(scrolls) => self.apply_scrolls(scrolls, &sender),
                    Err(e) => self.report_store_error(e),
                }
            }
            AppMsg::RulesChanged => {
                if let Err(e) = self.store.save_rules(&self.rules_text()) {
                    log::error!("Failed to save rules: {}", e);
                }
            }
            AppMsg::Spin => {
                if self.wheel.borrow_mut().spin(Instant::now()) {
                    self.spinning = true;
                    self.landed = None;
                    self.start_animation(&sender);
                }
            }
            AppMsg::Landed(outcome) => {
                log::info!("Wheel landed on '{}'", outcome.label);
                self.spinning = false;
                self.landed = Some(outcome.label);
            }
            AppMsg::Hover(cursor) => {
                let (w, h) = (self.drawing_area.width(), self.drawing_area.height());
                let changed = {
                    let mut wheel = self.wheel.borrow_mut();
                    let side = wheel.side();
                    wheel.update_hover(cursor.map(|p| to_wheel_space(p, w, h, side)))
                };
                if changed {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Resize(w, h) => {
                self.wheel.borrow_mut().resize(w, h);
                self.drawing_area.queue_draw();
            }
            AppMsg::DataChanged(path) => {
                if path == self.store.ninjas_path() {
                    let roster = self.store.load_roster();
                    if roster != self.roster {
                        log::info!("Roster reloaded");
                        self.roster = roster;
                        self.refresh_sections(&sender);
                    }
                } else if path == self.store.scrolls_path() {
                    let scrolls = self.store.load_scrolls();
                    if scrolls != self.scrolls {
                        log::info!("Scrolls reloaded");
                        self.apply_scrolls(scrolls, &sender);
                    }
                } else if path == self.store.rules_path() && !self.rules_view.has_focus() {
                    let rules = self.store.load_rules();
                    if rules != self.rules_text() {
                        log::info!("Rules reloaded");
                        self.rules_buffer.set_text(&rules);
                    }
                }
            }
        }
    }
}

impl AppModel {
    fn rules_text(&self) -> String {
        let (start, end) = self.rules_buffer.bounds();
        self.rules_buffer.text(&start, &end, false).to_string()
    }

    fn refresh_sections(&self, sender: &ComponentSender<Self>) {
        let idle = BatchSelection::default();
        for (rank, section) in &self.sections {
            let selection = self.selections.get(rank).unwrap_or(&idle);
            section.refresh(*rank, self.roster.by_rank(*rank), selection, sender);
        }
    }

    /// The wheel always mirrors the scroll list; rotation carries over.
    fn apply_scrolls(&mut self, scrolls: ScrollList, sender: &ComponentSender<Self>) {
        self.wheel.borrow_mut().set_segments(scrolls.labels());
        self.chips.refresh(scrolls.items(), sender);
        self.scrolls = scrolls;
        self.drawing_area.queue_draw();
    }

    fn start_animation(&self, sender: &ComponentSender<Self>) {
        let wheel = self.wheel.clone();
        let sender = sender.clone();
        self.drawing_area.add_tick_callback(move |area, _| {
            let outcome = wheel.borrow_mut().tick(Instant::now());
            area.queue_draw();
            match outcome {
                Some(outcome) => {
                    sender.input(AppMsg::Landed(outcome));
                    glib::ControlFlow::Break
                }
                None => glib::ControlFlow::Continue,
            }
        });
    }

    fn confirm_delete(
        &self,
        rank: Rank,
        doomed: Vec<NinjaName>,
        sender: &ComponentSender<Self>,
    ) {
        let dialog = gtk::AlertDialog::builder()
            .modal(true)
            .message("Confirm delete")
            .detail(delete_prompt(doomed.len()))
            .buttons(DELETE_BUTTONS)
            .cancel_button(DELETE_NO)
            .default_button(DELETE_NO)
            .build();

        let sender = sender.clone();
        dialog.choose(Some(&self.root), gtk::gio::Cancellable::NONE, move |choice| {
            if is_confirmed(&choice) {
                sender.input(AppMsg::ConfirmDelete(rank, doomed));
            } else {
                log::debug!("Batch delete in rank {} cancelled", rank);
            }
        });
    }

    fn report_store_error(&mut self, e: StoreError) {
        log::error!("Failed to save: {}", e);
        self.notice = Some(Notice::warning(format!("Could not save: {}", e)));
    }
}

fn build_wheel_area(
    wheel: &Rc<RefCell<Wheel>>,
    sender: &ComponentSender<AppModel>,
) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::new();
    area.set_size_request(MIN_SIDE, MIN_SIDE);
    area.set_hexpand(true);

    let wheel_draw = wheel.clone();
    area.set_draw_func(move |area, cr, width, height| {
        let style_context = area.style_context();
        let colors = WheelColors::from_context(&style_context);
        if let Err(e) = wheel_view::draw(cr, &wheel_draw.borrow(), &colors, width, height) {
            log::error!("Drawing error: {}", e);
        }
    });

    {
        let sender = sender.clone();
        area.connect_resize(move |_, w, h| sender.input(AppMsg::Resize(w, h)));
    }

    let motion = gtk::EventControllerMotion::new();
    {
        let sender = sender.clone();
        motion.connect_motion(move |_, x, y| {
            sender.input(AppMsg::Hover(Some(Point::new(x, y))));
        });
    }
    {
        let sender = sender.clone();
        motion.connect_leave(move |_| sender.input(AppMsg::Hover(None)));
    }
    area.add_controller(motion);

    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_prompt_names_the_count() {
        assert_eq!(delete_prompt(3), "Delete the 3 selected ninja(s)?");
    }

    #[test]
    fn test_only_yes_confirms_delete() {
        assert!(is_confirmed(&Ok(DELETE_YES)));
        assert!(!is_confirmed(&Ok(DELETE_NO)));
        assert!(!is_confirmed(&Err(glib::Error::new(
            gtk::DialogError::Dismissed,
            "closed"
        ))));
        assert_eq!(DELETE_BUTTONS[DELETE_NO as usize], "No");
        assert_eq!(DELETE_BUTTONS[DELETE_YES as usize], "Yes");
    }
}

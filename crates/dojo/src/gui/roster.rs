use crate::gui::app::{AppModel, AppMsg};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::ComponentSender;
use shinobi::roster::{BatchSelection, Ninja, Rank, ScrollName};

fn clear_flow_box(flow: &gtk::FlowBox) {
    while let Some(child) = flow.first_child() {
        flow.remove(&child);
    }
}

fn flow_box() -> gtk::FlowBox {
    let flow = gtk::FlowBox::new();
    flow.set_selection_mode(gtk::SelectionMode::None);
    flow.set_homogeneous(false);
    flow.set_row_spacing(2);
    flow.set_column_spacing(2);
    flow.set_max_children_per_line(64);
    flow
}

/// One rank's block on the right-hand side: header buttons and the card flow.
pub struct RankSection {
    pub root: gtk::Box,
    cards: gtk::FlowBox,
    batch: gtk::Button,
    select_all: gtk::Button,
    delete_selected: gtk::Button,
}

impl RankSection {
    pub fn new(rank: Rank, sender: &ComponentSender<AppModel>) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);

        let header = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let title = gtk::Label::new(Some(&format!("{} rank", rank)));
        title.add_css_class("section-title");

        let batch = gtk::Button::with_label("Batch delete");
        let select_all = gtk::Button::with_label("Select all");
        let delete_selected = gtk::Button::with_label("Delete selected");
        delete_selected.add_css_class("destructive-action");

        for (button, msg) in [
            (&batch, AppMsg::ToggleBatch(rank)),
            (&select_all, AppMsg::ToggleSelectAll(rank)),
            (&delete_selected, AppMsg::DeleteSelected(rank)),
        ] {
            let sender = sender.clone();
            button.connect_clicked(move |_| sender.input(msg.clone()));
        }

        header.append(&title);
        header.append(&batch);
        header.append(&select_all);

        let cards = flow_box();
        root.append(&header);
        root.append(&cards);
        root.append(&delete_selected);

        Self {
            root,
            cards,
            batch,
            select_all,
            delete_selected,
        }
    }

    pub fn refresh<'a>(
        &self,
        rank: Rank,
        ninjas: impl IntoIterator<Item = &'a Ninja>,
        selection: &BatchSelection,
        sender: &ComponentSender<AppModel>,
    ) {
        clear_flow_box(&self.cards);
        for ninja in ninjas {
            self.cards
                .insert(&ninja_card(rank, ninja, selection, sender), -1);
        }

        let active = selection.is_active();
        self.batch.set_visible(!active);
        self.select_all.set_visible(active);
        self.select_all.set_label(if selection.is_all_selected() {
            "Unselect all"
        } else {
            "Select all"
        });
        self.delete_selected.set_visible(active);
    }
}

fn ninja_card(
    rank: Rank,
    ninja: &Ninja,
    selection: &BatchSelection,
    sender: &ComponentSender<AppModel>,
) -> gtk::Box {
    let card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    card.add_css_class("ninja-card");
    let name = ninja.name.clone();

    if selection.is_active() {
        let check = gtk::CheckButton::with_label(name.as_str());
        // set before connecting so the initial state isn't echoed back
        check.set_active(selection.is_selected(&name));
        let sender = sender.clone();
        check.connect_toggled(move |c| {
            sender.input(AppMsg::CheckNinja(rank, name.clone(), c.is_active()));
        });
        card.append(&check);
    } else {
        let label = gtk::Label::new(Some(name.as_str()));
        label.set_xalign(0.0);
        let delete = gtk::Button::with_label("Delete");
        delete.add_css_class("flat");
        let sender = sender.clone();
        delete.connect_clicked(move |_| sender.input(AppMsg::RemoveNinja(name.clone())));
        card.append(&label);
        card.append(&delete);
    }
    card
}

/// The row of "Add" / "Batch" buttons for one rank in the left panel.
pub fn rank_add_row(rank: Rank, sender: &ComponentSender<AppModel>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    let label = gtk::Label::new(Some(&format!("{}", rank)));
    label.set_width_chars(4);
    label.add_css_class("section-title");

    let add = gtk::Button::with_label("Add");
    let batch = gtk::Button::with_label("Batch add");
    for (button, msg) in [(&add, AppMsg::QuickAdd(rank)), (&batch, AppMsg::BatchAdd(rank))] {
        let sender = sender.clone();
        button.connect_clicked(move |_| sender.input(msg.clone()));
    }

    row.append(&label);
    row.append(&add);
    row.append(&batch);
    row
}

pub struct ScrollChips {
    pub root: gtk::FlowBox,
}

impl ScrollChips {
    pub fn new() -> Self {
        Self { root: flow_box() }
    }

    pub fn refresh(&self, scrolls: &[ScrollName], sender: &ComponentSender<AppModel>) {
        clear_flow_box(&self.root);
        for scroll in scrolls {
            let chip = gtk::Box::new(gtk::Orientation::Vertical, 4);
            chip.add_css_class("scroll-chip");
            let label = gtk::Label::new(Some(scroll.as_str()));
            let delete = gtk::Button::with_label("Delete");
            delete.add_css_class("flat");

            let sender = sender.clone();
            let name = scroll.clone();
            delete.connect_clicked(move |_| sender.input(AppMsg::RemoveScroll(name.clone())));

            chip.append(&label);
            chip.append(&delete);
            self.root.insert(&chip, -1);
        }
    }
}

impl Default for ScrollChips {
    fn default() -> Self {
        Self::new()
    }
}

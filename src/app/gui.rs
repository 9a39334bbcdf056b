use super::forms::{InstrumentForm, COMMON_TAGS};
use super::scan::ScanRequest;
use super::shortcuts::{shortcuts, Shortcut};
use super::state::{Action, CatalogApp, View};
use crate::canvas::NodeKind;
use crate::instrument::{category_color, rarity_tier, Category, Host, Instrument, Position};
use crate::ui_state::{Analytics, Density, SortKey};
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use std::collections::HashSet;

const INSTRUMENT_NODE_SIZE: Vec2 = Vec2::new(150.0, 48.0);
const GROUP_NODE_SIZE: Vec2 = Vec2::new(200.0, 40.0);
const GROUP_NODE_EXPANDED_SIZE: Vec2 = Vec2::new(200.0, 72.0);
const SUGGESTION_COLOR: Color32 = Color32::from_rgb(250, 204, 21);
const CONNECT_COLOR: Color32 = Color32::from_rgb(56, 189, 248);

fn search_id() -> egui::Id {
    egui::Id::new("instrument_search")
}

/// Parses `#rrggbb`, falling back to gray for anything else.
pub fn parse_hex_color(hex: &str) -> Color32 {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color32::GRAY;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color32::from_rgb(r, g, b),
        _ => Color32::GRAY,
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_scan();
        if self.scanning() {
            ctx.request_repaint();
        }
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Instrument Catalog");
                ui.separator();
                ui.selectable_value(&mut self.view, View::Canvas, "Canvas");
                ui.selectable_value(&mut self.view, View::Collection, "Collection");
                ui.separator();
                if ui.button("Add Instrument").clicked() {
                    self.instrument_form = InstrumentForm::default();
                    self.ui.open_add_instrument();
                }
                ui.label(format!(
                    "{} instruments",
                    self.catalog.instruments().instruments().len()
                ));
            });
        });

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.filter_panel(ui);
                    ui.separator();
                    self.scanner_panel(ui);
                    ui.separator();
                    self.template_panel(ui);
                    ui.separator();
                    self.group_panel(ui);
                    ui.separator();
                    self.analytics_panel(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Canvas => self.canvas_view(ui),
            View::Collection => self.collection_view(ui),
        });

        self.instrument_dialog(ctx);
        self.delete_confirmation(ctx);
        self.error_window(ctx);

        self.apply_pending();
    }
}

impl CatalogApp {
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let search_focused = ctx.memory(|m| m.has_focus(search_id()));
        let typing = ctx.wants_keyboard_input();
        let events = ctx.input(|i| i.events.clone());

        for shortcut in shortcuts(&events, search_focused, typing) {
            match shortcut {
                Shortcut::FocusSearch => ctx.memory_mut(|m| m.request_focus(search_id())),
                Shortcut::NewInstrument => {
                    if !self.ui.is_edit_instrument_open() {
                        self.instrument_form = InstrumentForm::default();
                        self.ui.open_add_instrument();
                    }
                }
                Shortcut::ClearSearch => {
                    self.ui.set_search_query("");
                    ctx.memory_mut(|m| m.surrender_focus(search_id()));
                }
            }
        }
    }

    // Sidebar

    fn filter_panel(&mut self, ui: &mut egui::Ui) {
        ui.add(
            egui::TextEdit::singleline(&mut self.ui.search_query)
                .id(search_id())
                .hint_text("Search instruments... (Ctrl+K)")
                .desired_width(f32::INFINITY),
        );

        egui::CollapsingHeader::new("Categories")
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for category in Category::ALL {
                        let on = self.ui.selected_categories().contains(&category);
                        if ui.selectable_label(on, category.as_str()).clicked() {
                            self.ui.toggle_category(category);
                        }
                    }
                });
            });

        egui::CollapsingHeader::new("Hosts").show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for host in Host::ALL {
                    let on = self.ui.selected_hosts().contains(&host);
                    if ui.selectable_label(on, host.as_str()).clicked() {
                        self.ui.toggle_host(host);
                    }
                }
            });
        });

        let tags = self.catalog.instruments().all_tags();
        if !tags.is_empty() {
            egui::CollapsingHeader::new("Tags").show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for tag in &tags {
                        let on = self.ui.selected_tags().contains(tag);
                        if ui.selectable_label(on, tag).clicked() {
                            self.ui.toggle_tag(tag);
                        }
                    }
                });
            });
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.ui.has_active_filters(), egui::Button::new("Clear Filters"))
                .clicked()
            {
                self.ui.clear_filters();
            }
            if ui.button("Surprise Me").clicked() {
                self.ui.surprise_me(self.catalog.instruments().instruments());
            }
        });

        let suggestion = self
            .ui
            .suggested_instrument_id()
            .and_then(|id| self.catalog.instruments().get(id))
            .map(|inst| (inst.id.clone(), inst.name.clone()));
        if let Some((id, name)) = suggestion {
            ui.horizontal(|ui| {
                ui.colored_label(SUGGESTION_COLOR, format!("Try: {}", name));
                if ui.small_button("Used it").clicked() {
                    self.queue(Action::MarkUsed(id));
                    self.ui.set_suggested_instrument(None);
                }
                if ui.small_button("Dismiss").clicked() {
                    self.ui.set_suggested_instrument(None);
                }
            });
        }
    }

    fn scanner_panel(&mut self, ui: &mut egui::Ui) {
        ui.strong("Directory Scanner");

        let scanning = self.scanning();
        ui.add_enabled_ui(!scanning, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Scan Folder...").clicked() {
                    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                        self.start_scan(ScanRequest::Directory(dir));
                    }
                }
                if ui.button("Auto Scan").clicked() {
                    self.start_auto_scan();
                }
            });
        });

        if scanning {
            match &self.scan_progress {
                Some(progress) => {
                    let fraction = progress.current as f32 / progress.total.max(1) as f32;
                    ui.add(egui::ProgressBar::new(fraction).text(format!(
                        "{}/{}: {} found",
                        progress.current, progress.total, progress.found
                    )));
                    ui.small(progress.path.display().to_string());
                }
                None => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Scanning...");
                    });
                }
            }
        }

        if self.scanned_items.is_empty() {
            return;
        }

        ui.label(format!("{} candidates found", self.scanned_items.len()));
        ui.horizontal(|ui| {
            if ui.button("Select All").clicked() {
                self.select_all_scanned();
            }
            if ui.button("Clear").clicked() {
                self.clear_scan_selection();
            }
            let label = format!("Import Selected ({})", self.selected_items.len());
            if ui
                .add_enabled(!self.selected_items.is_empty(), egui::Button::new(label))
                .clicked()
            {
                let result = self.import_selected().map(|_| ());
                self.report(result);
            }
        });

        egui::ScrollArea::vertical()
            .id_source("scan_results")
            .max_height(260.0)
            .show(ui, |ui| {
                for (developer, items) in self.review_groups() {
                    let mut developer_selected = self.selected_developers.contains(&developer);

                    ui.horizontal(|ui| {
                        if ui.checkbox(&mut developer_selected, "").changed() {
                            self.toggle_developer(&developer);
                        }
                        ui.strong(format!("{} ({})", developer, items.len()));
                    });

                    ui.indent(&developer, |ui| {
                        for item in &items {
                            ui.horizontal(|ui| {
                                let mut selected = self.selected_items.contains(&item.path);
                                if ui.checkbox(&mut selected, "").changed() {
                                    self.toggle_scanned_item(item);
                                }

                                let name = item
                                    .parsed
                                    .as_ref()
                                    .and_then(|p| p.instrument_name.as_deref())
                                    .filter(|n| !n.is_empty())
                                    .unwrap_or(&item.name);
                                ui.label(name).on_hover_text(item.path.display().to_string());

                                if let Some(host) = item.parsed.as_ref().and_then(|p| p.host) {
                                    ui.weak(format!("({})", host));
                                }
                            });
                        }
                    });
                }
            });
    }

    fn template_panel(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Templates")
            .default_open(true)
            .show(ui, |ui| {
                let selection = self.current_selection().len();
                ui.weak(format!("{} instruments selected", selection));
                ui.add(
                    egui::TextEdit::singleline(&mut self.template_form.name)
                        .hint_text("Template name"),
                );
                ui.add(
                    egui::TextEdit::multiline(&mut self.template_form.description)
                        .hint_text("Description")
                        .desired_rows(2),
                );
                let ready = selection > 0 && !self.template_form.name.trim().is_empty();
                if ui
                    .add_enabled(ready, egui::Button::new("Save Selection as Template"))
                    .clicked()
                {
                    let result = self.create_template_from_selection();
                    self.report(result);
                }

                for template in self.catalog.templates().templates().to_vec() {
                    ui.group(|ui| {
                        ui.strong(&template.name);
                        if !template.description.is_empty() {
                            ui.label(&template.description);
                        }
                        ui.weak(format!(
                            "{} instruments, {} pairings",
                            template.instruments.len(),
                            template.pairings.len()
                        ));
                        ui.horizontal(|ui| {
                            if ui.button("Load").clicked() {
                                self.queue(Action::LoadTemplate(template.id.clone()));
                            }
                            if ui
                                .add_enabled(selection > 0, egui::Button::new("Update from Selection"))
                                .clicked()
                            {
                                self.queue(Action::RecaptureTemplate(template.id.clone()));
                            }
                            if ui.button("Delete").clicked() {
                                self.queue(Action::DeleteTemplate(template.id.clone()));
                            }
                        });
                    });
                }
            });
    }

    fn group_panel(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Groups").show(ui, |ui| {
            ui.add(egui::TextEdit::singleline(&mut self.group_form.name).hint_text("Group name"));
            ui.add(
                egui::TextEdit::singleline(&mut self.group_form.description)
                    .hint_text("Description"),
            );
            ui.horizontal(|ui| {
                for category in Category::ALL {
                    let hex = category_color(category);
                    let mut button = egui::Button::new("  ").fill(parse_hex_color(hex));
                    if self.group_form.color == hex {
                        button = button.stroke(Stroke::new(2.0, Color32::WHITE));
                    }
                    if ui.add(button).on_hover_text(category.as_str()).clicked() {
                        self.group_form.color = hex.to_string();
                    }
                }
            });
            if ui
                .add_enabled(
                    !self.group_form.name.trim().is_empty(),
                    egui::Button::new("Create Group from Selection"),
                )
                .clicked()
            {
                let result = self.create_group_from_selection();
                self.report(result);
            }

            let selection = self.current_selection();
            for group in self.catalog.groups().groups().to_vec() {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        let arrow = if group.collapsed { "▶" } else { "▼" };
                        if ui.small_button(arrow).clicked() {
                            self.queue(Action::ToggleGroup(group.id.clone()));
                        }
                        ui.colored_label(parse_hex_color(&group.color), "■");
                        ui.strong(format!("{} ({})", group.name, group.instruments.len()));
                    });

                    if !group.collapsed {
                        for member in &group.instruments {
                            let name = self
                                .catalog
                                .instruments()
                                .get(member)
                                .map(|inst| inst.name.clone())
                                .unwrap_or_else(|| format!("missing ({})", member));
                            ui.horizontal(|ui| {
                                if ui.small_button("✕").clicked() {
                                    self.queue(Action::RemoveFromGroup(
                                        group.id.clone(),
                                        member.clone(),
                                    ));
                                }
                                ui.label(name);
                            });
                        }
                    }

                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(!selection.is_empty(), egui::Button::new("Add Selection"))
                            .clicked()
                        {
                            for id in &selection {
                                self.queue(Action::AddToGroup(group.id.clone(), id.clone()));
                            }
                        }
                        if ui.button("Delete").clicked() {
                            self.queue(Action::DeleteGroup(group.id.clone()));
                        }
                    });
                });
            }
        });
    }

    fn analytics_panel(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Analytics").show(ui, |ui| {
            let stats = Analytics::compute(
                self.catalog.instruments().instruments(),
                chrono::Utc::now(),
            );
            ui.label(format!(
                "{} instruments, {} used, {} never used",
                stats.total, stats.used, stats.never_used
            ));

            if !stats.most_used.is_empty() {
                ui.strong("Most used");
                for inst in &stats.most_used {
                    ui.label(format!("{} ({}x)", inst.name, inst.metadata.usage_count));
                }
            }

            if !stats.least_recently_used.is_empty() {
                ui.strong("Gathering dust");
                for (inst, days) in &stats.least_recently_used {
                    ui.label(format!("{}: {} days", inst.name, days));
                }
            }

            if !stats.by_category.is_empty() {
                ui.strong("By category");
                for (category, count) in &stats.by_category {
                    ui.horizontal(|ui| {
                        ui.colored_label(parse_hex_color(category_color(*category)), "■");
                        ui.label(format!("{}: {}", category, count));
                    });
                }
            }
        });
    }

    // Canvas

    fn canvas_view(&mut self, ui: &mut egui::Ui) {
        let graph = self.graph();
        let hidden: HashSet<String> = self
            .catalog
            .instruments()
            .instruments()
            .iter()
            .filter(|inst| !self.ui.visible_on_canvas(inst))
            .map(|inst| inst.id.clone())
            .collect();

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let origin = response.rect.min.to_vec2();
        painter.rect_filled(response.rect, 0.0, Color32::from_gray(24));

        let live_position = |id: &str, stored: Position| match &self.dragging {
            Some((dragged, position)) if dragged == id => *position,
            _ => stored,
        };
        let node_rect = |kind: NodeKind, id: &str, position: Position| {
            let size = match kind {
                NodeKind::Instrument => INSTRUMENT_NODE_SIZE,
                NodeKind::Group => match self.catalog.groups().get(id) {
                    Some(group) if !group.collapsed => GROUP_NODE_EXPANDED_SIZE,
                    _ => GROUP_NODE_SIZE,
                },
            };
            Rect::from_min_size(Pos2::new(position.x, position.y) + origin, size)
        };

        for edge in &graph.edges {
            if hidden.contains(&edge.source) || hidden.contains(&edge.target) {
                continue;
            }
            let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
            else {
                continue;
            };
            let a = node_rect(source.kind, &source.id, live_position(&source.id, source.position));
            let b = node_rect(target.kind, &target.id, live_position(&target.id, target.position));
            painter.line_segment([a.center(), b.center()], Stroke::new(2.0, Color32::from_gray(120)));
        }

        let modifier_held = ui.input(|i| i.modifiers.command);
        let suggested = self.ui.suggested_instrument_id().map(str::to_string);
        let suggested_neighbors = suggested
            .as_deref()
            .map(|id| graph.connected_node_ids(id))
            .unwrap_or_default();
        let mut actions = Vec::new();
        let mut drag_update = None;
        let mut node_clicked = false;

        for node in &graph.nodes {
            if node.kind == NodeKind::Instrument && hidden.contains(&node.id) {
                continue;
            }
            let position = live_position(&node.id, node.position);
            let rect = node_rect(node.kind, &node.id, position);
            let node_response = ui.interact(
                rect,
                ui.id().with(("canvas_node", &node.id)),
                egui::Sense::click_and_drag(),
            );

            if node_response.dragged() {
                let delta = node_response.drag_delta();
                drag_update = Some((
                    node.id.clone(),
                    Position::new(position.x + delta.x, position.y + delta.y),
                ));
            }
            if node_response.drag_released() {
                actions.push(match node.kind {
                    NodeKind::Instrument => Action::NodeDragged(node.id.clone(), position),
                    NodeKind::Group => Action::GroupMoved(node.id.clone(), position),
                });
            }
            if node_response.clicked() {
                node_clicked = true;
                match node.kind {
                    NodeKind::Instrument if modifier_held => match self.connect_from.take() {
                        Some(from) if from != node.id => {
                            actions.push(Action::Connect(from, node.id.clone()));
                        }
                        Some(_) => {}
                        None => self.connect_from = Some(node.id.clone()),
                    },
                    NodeKind::Instrument => actions.push(Action::NodeClicked(node.id.clone())),
                    NodeKind::Group => actions.push(Action::ToggleGroup(node.id.clone())),
                }
            }

            let mut stroke = Stroke::new(1.0, Color32::from_gray(90));
            if self.selected_node_ids.contains(&node.id) {
                stroke = Stroke::new(2.0, Color32::WHITE);
            }
            if self.connect_from.as_deref() == Some(node.id.as_str()) {
                stroke = Stroke::new(2.5, CONNECT_COLOR);
            }
            if suggested_neighbors.contains(&node.id) {
                stroke = Stroke::new(2.0, SUGGESTION_COLOR.gamma_multiply(0.6));
            }
            if suggested.as_deref() == Some(node.id.as_str()) {
                stroke = Stroke::new(3.0, SUGGESTION_COLOR);
            }

            let color = parse_hex_color(&node.color);
            match node.kind {
                NodeKind::Instrument => {
                    painter.rect_filled(rect, 6.0, color.gamma_multiply(0.8));
                    painter.rect_stroke(rect, 6.0, stroke);
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        &node.label,
                        egui::FontId::proportional(14.0),
                        Color32::WHITE,
                    );
                }
                NodeKind::Group => {
                    painter.rect_filled(rect, 8.0, color.gamma_multiply(0.25));
                    painter.rect_stroke(rect, 8.0, Stroke::new(stroke.width.max(1.5), color));
                    if let Some(group) = self.catalog.groups().get(&node.id) {
                        let arrow = if group.collapsed { "▶" } else { "▼" };
                        painter.text(
                            rect.left_top() + Vec2::new(10.0, 10.0),
                            egui::Align2::LEFT_TOP,
                            format!("{} {} ({})", arrow, group.name, group.instruments.len()),
                            egui::FontId::proportional(14.0),
                            Color32::WHITE,
                        );
                        if !group.collapsed && !group.description.is_empty() {
                            painter.text(
                                rect.left_top() + Vec2::new(10.0, 36.0),
                                egui::Align2::LEFT_TOP,
                                &group.description,
                                egui::FontId::proportional(12.0),
                                Color32::LIGHT_GRAY,
                            );
                        }
                    }
                }
            }

            let first_selected = self.selected_node_ids.first().cloned();
            let node_id = node.id.clone();
            let kind = node.kind;
            node_response.context_menu(|ui| match kind {
                NodeKind::Instrument => {
                    if ui.button("Edit").clicked() {
                        actions.push(Action::Edit(node_id.clone()));
                        ui.close_menu();
                    }
                    if ui.button("Mark as Used").clicked() {
                        actions.push(Action::MarkUsed(node_id.clone()));
                        ui.close_menu();
                    }
                    if let Some(first) = first_selected.filter(|first| *first != node_id) {
                        if ui.button("Create Pairing").clicked() {
                            actions.push(Action::Connect(first, node_id.clone()));
                            ui.close_menu();
                        }
                    }
                    if ui.button("Delete").clicked() {
                        actions.push(Action::Delete(node_id.clone()));
                        ui.close_menu();
                    }
                }
                NodeKind::Group => {
                    if ui.button("Collapse / Expand").clicked() {
                        actions.push(Action::ToggleGroup(node_id.clone()));
                        ui.close_menu();
                    }
                    if ui.button("Delete Group").clicked() {
                        actions.push(Action::DeleteGroup(node_id.clone()));
                        ui.close_menu();
                    }
                }
            });
        }

        if let Some(update) = drag_update {
            self.dragging = Some(update);
        }
        if response.clicked() && !node_clicked {
            self.selected_node_ids.clear();
            self.connect_from = None;
        }

        painter.text(
            response.rect.left_bottom() + Vec2::new(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            "Drag to move. Ctrl/Cmd-click two instruments to pair them. Right-click for more.",
            egui::FontId::proportional(12.0),
            Color32::GRAY,
        );

        for action in actions {
            self.queue(action);
        }
    }

    // Collection

    fn collection_view(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut sort_by = self.ui.collection().sort_by;
            egui::ComboBox::from_label("Sort by")
                .selected_text(sort_by.label())
                .show_ui(ui, |ui| {
                    for key in SortKey::ALL {
                        ui.selectable_value(&mut sort_by, key, key.label());
                    }
                });
            if sort_by != self.ui.collection().sort_by {
                self.ui.set_collection_sort(sort_by);
            }

            ui.separator();
            let mut density = self.ui.collection().density;
            ui.selectable_value(&mut density, Density::Compact, "Compact");
            ui.selectable_value(&mut density, Density::Spacious, "Spacious");
            if density != self.ui.collection().density {
                self.ui.set_view_density(density);
            }

            let selected = self.ui.collection().selected_card_ids.len();
            if selected > 0 {
                ui.separator();
                ui.label(format!("{} selected", selected));
                if ui.button("Clear Selection").clicked() {
                    self.ui.clear_selection();
                }
            }
        });
        ui.separator();

        let instruments = self.catalog.instruments().instruments().to_vec();
        let items = self.ui.collection_items(&instruments);
        if items.is_empty() {
            ui.label("No instruments match the current filters.");
            return;
        }

        let density = self.ui.collection().density;
        let first_selected = self.current_selection().first().cloned();
        let mut actions = Vec::new();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for inst in items {
                    let selected = self.ui.is_card_selected(&inst.id);
                    let can_pair = first_selected
                        .as_deref()
                        .is_some_and(|first| first != inst.id && !inst.is_paired_with(first));
                    instrument_card(ui, inst, density, selected, can_pair, &mut actions);
                }
            });
        });

        for action in actions {
            self.queue(action);
        }
    }

    // Windows

    fn instrument_dialog(&mut self, ctx: &egui::Context) {
        let editing = self.ui.is_edit_instrument_open();
        if !editing && !self.ui.is_add_instrument_open() {
            return;
        }

        let title = if editing { "Edit Instrument" } else { "Add New Instrument" };
        let mut submit = false;
        let mut cancel = false;
        let form = &mut self.instrument_form;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("instrument_form")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Name *");
                        ui.add(egui::TextEdit::singleline(&mut form.name).hint_text("e.g., BBC Symphony Orchestra"));
                        ui.end_row();

                        ui.label("Developer *");
                        ui.add(egui::TextEdit::singleline(&mut form.developer).hint_text("e.g., Spitfire Audio"));
                        ui.end_row();

                        ui.label("Host");
                        egui::ComboBox::from_id_source("instrument_host")
                            .selected_text(form.host.as_str())
                            .show_ui(ui, |ui| {
                                for host in Host::ALL {
                                    ui.selectable_value(&mut form.host, host, host.as_str());
                                }
                            });
                        ui.end_row();

                        ui.label("Category");
                        egui::ComboBox::from_id_source("instrument_category")
                            .selected_text(form.category.as_str())
                            .show_ui(ui, |ui| {
                                for category in Category::ALL {
                                    ui.selectable_value(&mut form.category, category, category.as_str());
                                }
                            });
                        ui.end_row();
                    });

                ui.label("Tags");
                ui.horizontal_wrapped(|ui| {
                    let extra: Vec<String> = form
                        .tags
                        .iter()
                        .filter(|t| !COMMON_TAGS.contains(&t.as_str()))
                        .cloned()
                        .collect();
                    for tag in COMMON_TAGS.iter().copied().chain(extra.iter().map(String::as_str)) {
                        let on = form.tags.iter().any(|t| t == tag);
                        if ui.selectable_label(on, tag).clicked() {
                            form.toggle_tag(tag);
                        }
                    }
                });
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut form.custom_tag).hint_text("Custom tag"),
                    );
                    let entered =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Add Tag").clicked() || entered {
                        form.commit_custom_tag();
                    }
                });

                ui.label("Notes");
                ui.text_edit_multiline(&mut form.notes);

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    let label = if editing { "Save Changes" } else { "Add Instrument" };
                    if ui
                        .add_enabled(form.is_complete(), egui::Button::new(label))
                        .clicked()
                    {
                        submit = true;
                    }
                });
            });

        if cancel {
            self.ui.close_add_instrument();
            self.ui.close_edit_instrument();
            self.instrument_form = InstrumentForm::default();
        } else if submit {
            let result = self.submit_instrument_form();
            self.report(result);
        }
    }

    fn delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete.clone() else {
            return;
        };
        let name = self
            .catalog
            .instruments()
            .get(&id)
            .map(|inst| inst.name.clone())
            .unwrap_or_default();

        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Are you sure you want to delete {}?", name));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.pending_delete = None;
                    }
                    if ui.button("Delete").clicked() {
                        self.queue(Action::ConfirmDelete(id.clone()));
                    }
                });
            });
    }

    fn error_window(&mut self, ctx: &egui::Context) {
        if let Some(error_message) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(error_message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            self.error_message = None;
                        }
                    });
                });
        }
    }
}

fn instrument_card(
    ui: &mut egui::Ui,
    inst: &Instrument,
    density: Density,
    selected: bool,
    can_pair: bool,
    actions: &mut Vec<Action>,
) {
    let width = match density {
        Density::Compact => 180.0,
        Density::Spacious => 260.0,
    };
    let mut frame = egui::Frame::group(ui.style());
    if selected {
        frame = frame.stroke(Stroke::new(2.0, Color32::WHITE));
    }

    frame.show(ui, |ui| {
        ui.set_width(width);
        ui.horizontal(|ui| {
            let mut checked = selected;
            if ui.checkbox(&mut checked, "").changed() {
                actions.push(Action::ToggleCard(inst.id.clone()));
            }
            ui.colored_label(parse_hex_color(&inst.color), "●");
            ui.strong(&inst.name);
        });
        ui.weak(&inst.developer);

        if density == Density::Spacious {
            ui.label(format!("{} / {}", inst.category, inst.host));
            if !inst.tags.is_empty() {
                ui.small(inst.tags.join(", "));
            }
            if !inst.notes.is_empty() {
                ui.small(&inst.notes);
            }
            ui.small(format!(
                "{}, used {} times",
                rarity_tier(inst.metadata.usage_count).label(),
                inst.metadata.usage_count
            ));
        }

        ui.horizontal(|ui| {
            if ui.small_button("Used").clicked() {
                actions.push(Action::MarkUsed(inst.id.clone()));
            }
            if ui.small_button("Edit").clicked() {
                actions.push(Action::Edit(inst.id.clone()));
            }
            if can_pair && ui.small_button("Pair").clicked() {
                actions.push(Action::PairWithSelection(inst.id.clone()));
            }
            if ui.small_button("Delete").clicked() {
                actions.push(Action::Delete(inst.id.clone()));
            }
        });
    });
}

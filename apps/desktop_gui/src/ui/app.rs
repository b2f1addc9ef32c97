use std::{collections::HashMap, sync::Arc, time::Duration};

use client_core::{
    CompletedLookup, CountryClient, DisplaySurface, LookupController, LookupTicket,
    ModeToggleController, RegionModes,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::{DisplayField, FlagRef, ModeRegion, VisualMode};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::media::PreviewImage;
use crate::ui::theme::{error_text_color, palette_for, visuals_for};

const FLAG_DISPLAY_WIDTH: f32 = 240.0;

pub struct CountryLookupApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: Arc<LookupController<CountryClient>>,
    search_input: String,
    fields: HashMap<DisplayField, String>,
    flag: Option<FlagRef>,
    flag_visible: bool,
    flag_texture: Option<TextureHandle>,
    info_visible: bool,
    rendered_ticket: Option<LookupTicket>,
    mode_toggle: ModeToggleController,
    region_modes: RegionModes,
    applied_body_mode: Option<VisualMode>,
    status: String,
    status_banner: Option<UiError>,
}

impl CountryLookupApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        controller: Arc<LookupController<CountryClient>>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller,
            search_input: String::new(),
            fields: HashMap::new(),
            flag: None,
            flag_visible: false,
            flag_texture: None,
            info_visible: false,
            rendered_ticket: None,
            mode_toggle: ModeToggleController::new(),
            region_modes: RegionModes::default(),
            applied_body_mode: None,
            status: "Starting backend worker...".to_string(),
            status_banner: None,
        };
        app.mode_toggle.initialize(&mut app.region_modes);
        app
    }

    fn field(&self, field: DisplayField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    fn region_mode(&self, region: ModeRegion) -> VisualMode {
        self.region_modes.mode_of(region)
    }

    fn submit_search(&mut self) {
        let ticket = self.controller.begin();
        let cmd = BackendCommand::Lookup {
            ticket,
            query: self.search_input.clone(),
        };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.status_banner = Some(err);
        }
    }

    fn toggle_mode(&mut self) {
        self.mode_toggle.toggle(&mut self.region_modes);
    }

    /// Renders a finished lookup if it is still the newest one and queues the
    /// raster flag download. Returns whether it was rendered.
    fn apply_completed_lookup(&mut self, completed: CompletedLookup) -> bool {
        let controller = Arc::clone(&self.controller);
        if !controller.render_if_current(&completed, self) {
            return false;
        }
        self.rendered_ticket = Some(completed.ticket);

        self.status = match (&completed.query, completed.state.is_populated()) {
            (None, _) => "Please enter a country name.".to_string(),
            (Some(query), true) => format!("Showing results for \"{query}\""),
            (Some(query), false) => format!("No results for \"{query}\""),
        };

        if let Some(url) = completed.state.flag().and_then(|f| f.png_url.clone()) {
            let cmd = BackendCommand::FetchFlag {
                ticket: completed.ticket,
                url,
            };
            if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
                self.status_banner = Some(err);
            }
        }
        true
    }

    fn flag_event_is_current(&self, ticket: LookupTicket) -> bool {
        self.rendered_ticket == Some(ticket) && self.controller.is_current(ticket)
    }

    /// Applies one backend event; returns a flag image ready for upload.
    fn handle_ui_event(&mut self, event: UiEvent) -> Option<PreviewImage> {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::Error(err) => {
                tracing::error!(context = ?err.context(), "{}", err.message());
                self.status_banner = Some(err);
            }
            UiEvent::LookupCompleted(completed) => {
                self.apply_completed_lookup(completed);
            }
            UiEvent::FlagLoaded { ticket, image } => {
                if self.flag_event_is_current(ticket) {
                    return Some(image);
                }
            }
            UiEvent::FlagFailed { ticket, reason } => {
                if self.flag_event_is_current(ticket) {
                    self.status_banner = Some(UiError::from_message(
                        UiErrorContext::FlagDownload,
                        reason,
                    ));
                }
            }
        }
        None
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let Some(image) = self.handle_ui_event(event) {
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
                self.flag_texture =
                    Some(ctx.load_texture("country-flag", color_image, egui::TextureOptions::LINEAR));
            }
        }
    }

    fn apply_visuals_if_needed(&mut self, ctx: &egui::Context) {
        let body_mode = self.region_mode(ModeRegion::Body);
        if self.applied_body_mode == Some(body_mode) {
            return;
        }
        ctx.set_visuals(visuals_for(body_mode));
        self.applied_body_mode = Some(body_mode);
    }

    fn show_navbar(&mut self, ctx: &egui::Context) {
        let palette = palette_for(ModeRegion::Navbar, self.region_mode(ModeRegion::Navbar));
        egui::TopBottomPanel::top("navbar")
            .frame(
                egui::Frame::NONE
                    .fill(palette.fill)
                    .stroke(egui::Stroke::new(1.0, palette.stroke))
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Country Explorer")
                            .size(20.0)
                            .strong()
                            .color(palette.text),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let label = self.region_modes.toggle_label().to_string();
                        if ui.button(label).clicked() {
                            self.toggle_mode();
                        }
                    });
                });
            });
    }

    fn show_footer(&mut self, ctx: &egui::Context) {
        let palette = palette_for(ModeRegion::Footer, self.region_mode(ModeRegion::Footer));
        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::NONE
                    .fill(palette.fill)
                    .stroke(egui::Stroke::new(1.0, palette.stroke))
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&self.status).color(palette.muted));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.hyperlink_to("Data: REST Countries", "https://restcountries.com");
                    });
                });
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} error: {}",
                            err_label(banner.category()),
                            banner.message()
                        ))
                        .color(egui::Color32::WHITE),
                    );
                    if ui.button("Dismiss").clicked() {
                        self.status_banner = None;
                    }
                });
            });
    }

    fn show_search_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .id_salt("search")
                    .hint_text("Enter a country name")
                    .desired_width(280.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Search").clicked() || submitted {
                self.submit_search();
            }
        });
    }

    fn show_country_info(&mut self, ui: &mut egui::Ui) {
        let palette = palette_for(
            ModeRegion::CountryInfo,
            self.region_mode(ModeRegion::CountryInfo),
        );
        egui::Frame::NONE
            .fill(palette.fill)
            .stroke(egui::Stroke::new(1.0, palette.stroke))
            .corner_radius(10.0)
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if self.flag_visible {
                        if let Some(texture) = &self.flag_texture {
                            ui.add(
                                egui::Image::from_texture(egui::load::SizedTexture::from_handle(
                                    texture,
                                ))
                                .max_width(FLAG_DISPLAY_WIDTH),
                            );
                        } else if let Some(flag) = &self.flag {
                            ui.hyperlink_to(flag.alt.as_str(), flag.svg_url.as_str());
                        }
                    }
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(self.field(DisplayField::CountryName))
                                .size(24.0)
                                .strong()
                                .color(palette.text),
                        );
                        for field in [
                            DisplayField::CapitalCity,
                            DisplayField::Population,
                            DisplayField::Region,
                        ] {
                            ui.label(
                                egui::RichText::new(self.field(field)).color(palette.muted),
                            );
                        }
                    });
                });
            });
    }

    fn show_body(&mut self, ctx: &egui::Context) {
        let body_mode = self.region_mode(ModeRegion::Body);
        let palette = palette_for(ModeRegion::Body, body_mode);
        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(palette.fill)
                    .inner_margin(egui::Margin::same(24)),
            )
            .show(ctx, |ui| {
                self.show_status_banner(ui);
                self.show_search_row(ui);
                ui.add_space(12.0);

                let error = self.field(DisplayField::ErrorMessage).to_string();
                if !error.is_empty() {
                    ui.label(egui::RichText::new(error).color(error_text_color(body_mode)));
                    ui.add_space(8.0);
                }

                if self.info_visible {
                    self.show_country_info(ui);
                }
            });
    }
}

impl DisplaySurface for CountryLookupApp {
    fn set_field(&mut self, field: DisplayField, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    fn set_flag_visible(&mut self, visible: bool) {
        self.flag_visible = visible;
        if !visible {
            self.flag = None;
            self.flag_texture = None;
        }
    }

    fn set_flag_source(&mut self, flag: &FlagRef) {
        if self.flag.as_ref() != Some(flag) {
            self.flag_texture = None;
        }
        self.flag = Some(flag.clone());
    }

    fn set_info_visible(&mut self, visible: bool) {
        self.info_visible = visible;
    }
}

impl eframe::App for CountryLookupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);
        self.apply_visuals_if_needed(ctx);

        self.show_navbar(ctx);
        self.show_footer(ctx);
        self.show_body(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

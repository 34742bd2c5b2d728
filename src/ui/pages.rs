//! Page bodies rendered inside the layout.

use iced::widget::{checkbox, column, container, pick_list, row, text, text_input, Column, Row, Space};
use iced::{Alignment, Color, Element, Font, Length};

use super::widgets::{
    action_button, badge, bar_chart, cell, cell_gauge, dataset_view, gauge_colors, info_row, line_chart, link_button,
    menu_tab, mono_cell, page_title, panel, section_title, stat_card, table, themed_bar, BarCfg, LineCfg,
};
use super::{EnergyTab, Message, Mobilis, SecurityTab};
use crate::chart::{value_range, Series};
use crate::gauge::{maintenance_target, weakest_cell};
use crate::guard::Route;
use crate::i18n::Language;
use crate::models::{CellCharge, Role};
use crate::theme::Palette;

/// Fixed y range of the grid frequency chart, Hz.
pub const FREQUENCY_RANGE: (f32, f32) = (49.5, 50.5);

const CHART_HEIGHT: f32 = 240.0;

/// Colour of a status keyword coming from the backend.
fn status_color(status: &str, p: &Palette) -> Color {
    match status {
        "good" | "active" | "authorized" => p.green,
        "attention" | "warning" | "low" => p.yellow,
        "urgent" | "critical" | "inactive" | "unauthorized" => p.red,
        _ => p.label,
    }
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| name(i).to_string()).collect()
}

impl Mobilis {
    // ─── LOGIN ──────────────────────────────────────────────────

    pub(super) fn view_login(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let form = &self.login;

        let roles = Row::with_children(Role::ALL.iter().map(|role| {
            menu_tab(self.t(role.key()), Message::LoginRoleSelected(*role), *role == form.role, p)
        }))
        .spacing(6);

        let submit_label = if form.submitting { self.t("loading") } else { self.t("signin") };
        let submit = action_button(submit_label, (!form.submitting).then_some(Message::LoginSubmit), p.accent);

        let card = column![
            text("Mobilis").size(28).color(p.accent),
            text(self.t("welcome")).size(13).color(p.label),
            Space::with_height(10),
            text(self.t("email")).size(12).color(p.label),
            text_input("operator@mobilis.com", &form.email)
                .on_input(Message::LoginEmailChanged)
                .on_submit(Message::LoginSubmit)
                .padding(8),
            text(self.t("password")).size(12).color(p.label),
            text_input("••••••••", &form.password)
                .on_input(Message::LoginPasswordChanged)
                .on_submit(Message::LoginSubmit)
                .secure(true)
                .padding(8),
            text(self.t("role")).size(12).color(p.label),
            roles,
            row![
                checkbox(self.t("remember"), form.remember)
                    .on_toggle(Message::LoginRememberToggled)
                    .text_size(12),
                Space::with_width(Length::Fill),
                text(self.t("forgot")).size(12).color(p.label),
            ]
            .align_y(Alignment::Center),
            Space::with_height(6),
            submit,
        ]
        .spacing(8)
        .width(360);

        let chrome = row![
            pick_list(Language::ALL, Some(self.translator.language()), Message::LanguageSelected)
                .text_size(12)
                .padding([4, 8]),
            link_button(self.t(self.theme_mode.toggle_key()), Message::ToggleTheme, p.label),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        container(
            column![chrome, container(panel(card.into(), p)).width(400)]
                .spacing(16)
                .align_x(Alignment::Center),
        )
        .center(Length::Fill)
        .into()
    }

    pub(super) fn view_not_found(&self) -> Element<'_, Message> {
        let p = &self.pal;
        container(
            column![
                text("404").size(64).font(Font::MONOSPACE).color(p.accent),
                text(self.t("not_found")).size(16).color(p.text),
                link_button(self.t("go_home"), Message::Navigate(Route::Dashboard), p.accent),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        )
        .center(Length::Fill)
        .into()
    }

    // ─── DASHBOARD ──────────────────────────────────────────────

    pub(super) fn view_dashboard(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let t = &self.translator;
        let greeting = match self.session.user() {
            Some(user) => format!("{}, {} ({})", t.t("welcome"), user.name, t.t(user.role.key())),
            None => format!("{}, {}", t.t("welcome"), t.t("user")),
        };

        let energy = dataset_view(&self.data.monthly_energy, t, p, |rows| {
            let series = vec![
                Series::new(t.t("consumption"), p.red, rows.iter().map(|r| r.consumption).collect()),
                Series::new(t.t("production"), p.green, rows.iter().map(|r| r.production).collect()),
            ];
            bar_chart(
                BarCfg {
                    title: t.t("energy").to_string(),
                    y_max: value_range(&series, true).1,
                    categories: names(rows, |r| &r.name),
                    series,
                    unit: " kWh",
                    bar_colors: None,
                    height: CHART_HEIGHT,
                },
                p,
            )
        });

        let temperature = dataset_view(&self.data.daily_temperature, t, p, |rows| {
            let series = vec![Series::new(t.t("temperature"), p.yellow, rows.iter().map(|r| r.temp).collect())];
            line_chart(
                LineCfg {
                    title: t.t("temperature").to_string(),
                    y_range: value_range(&series, false),
                    categories: names(rows, |r| &r.name),
                    series,
                    filled: true,
                    unit: "°C",
                    height: CHART_HEIGHT,
                },
                p,
            )
        });

        let alerts = dataset_view(&self.data.weekly_alerts, t, p, |rows| {
            let series = vec![Series::new(t.t("alerts"), p.red, rows.iter().map(|r| r.alerts).collect())];
            bar_chart(
                BarCfg {
                    title: t.t("security").to_string(),
                    y_max: value_range(&series, true).1,
                    categories: names(rows, |r| &r.name),
                    series,
                    unit: "",
                    bar_colors: None,
                    height: CHART_HEIGHT,
                },
                p,
            )
        });

        column![
            page_title(t.t("dashboard"), greeting, p),
            panel(energy, p),
            row![panel(temperature, p), panel(alerts, p)].spacing(16),
        ]
        .spacing(16)
        .into()
    }

    // ─── ENERGY ─────────────────────────────────────────────────

    pub(super) fn view_energy(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let t = &self.translator;

        let tabs = row![
            menu_tab(t.t("solar_panels"), Message::EnergyTabSelected(EnergyTab::Solar), self.energy_tab == EnergyTab::Solar, p),
            menu_tab(t.t("temperature"), Message::EnergyTabSelected(EnergyTab::Temperature), self.energy_tab == EnergyTab::Temperature, p),
            menu_tab(t.t("rb_cells"), Message::EnergyTabSelected(EnergyTab::RbCells), self.energy_tab == EnergyTab::RbCells, p),
            menu_tab(t.t("frequency"), Message::EnergyTabSelected(EnergyTab::Frequency), self.energy_tab == EnergyTab::Frequency, p),
        ]
        .spacing(6);

        let body: Element<Message> = match self.energy_tab {
            EnergyTab::Solar => dataset_view(&self.data.solar, t, p, |rows| {
                let latest = rows.last();
                let cards = row![
                    stat_card(t.t("production"), latest.map(|r| format!("{:.1} kW", r.output)).unwrap_or_else(|| "-".into()), p.green, p),
                    stat_card(t.t("temperature"), latest.map(|r| format!("{:.1} °C", r.temp)).unwrap_or_else(|| "-".into()), p.yellow, p),
                ]
                .spacing(16);
                let series = vec![
                    Series::new(t.t("production"), p.green, rows.iter().map(|r| r.output).collect()),
                    Series::new(t.t("temperature"), p.yellow, rows.iter().map(|r| r.temp).collect()),
                ];
                let chart = line_chart(
                    LineCfg {
                        title: t.t("solar_panels").to_string(),
                        y_range: value_range(&series, true),
                        categories: names(rows, |r| &r.time),
                        series,
                        filled: false,
                        unit: "",
                        height: CHART_HEIGHT,
                    },
                    p,
                );
                column![cards, panel(chart, p)].spacing(16).into()
            }),
            EnergyTab::Temperature => dataset_view(&self.data.panel_temperature, t, p, |rows| {
                let series = vec![Series::new(t.t("temperature"), p.red, rows.iter().map(|r| r.temp).collect())];
                panel(
                    line_chart(
                        LineCfg {
                            title: t.t("temperature").to_string(),
                            y_range: value_range(&series, false),
                            categories: names(rows, |r| &r.name),
                            series,
                            filled: true,
                            unit: "°C",
                            height: CHART_HEIGHT,
                        },
                        p,
                    ),
                    p,
                )
            }),
            EnergyTab::RbCells => dataset_view(&self.data.rb_cells, t, p, |cells| self.rb_cells_view(cells)),
            EnergyTab::Frequency => dataset_view(&self.data.frequency, t, p, |rows| {
                let current = rows.last().map(|r| format!("{:.2} Hz", r.value)).unwrap_or_else(|| "-".into());
                let series = vec![Series::new(t.t("frequency"), p.blue, rows.iter().map(|r| r.value).collect())];
                let chart = line_chart(
                    LineCfg {
                        title: t.t("frequency").to_string(),
                        y_range: FREQUENCY_RANGE,
                        categories: names(rows, |r| &r.time),
                        series,
                        filled: false,
                        unit: " Hz",
                        height: CHART_HEIGHT,
                    },
                    p,
                );
                panel(column![info_row(t.t("current"), current, p), chart].spacing(10).into(), p)
            }),
        };

        column![page_title(t.t("energy"), t.t("monitoring"), p), tabs, body]
            .spacing(16)
            .into()
    }

    fn rb_cells_view<'a>(&self, cells: &'a [CellCharge]) -> Element<'a, Message> {
        let p = &self.pal;
        let t = &self.translator;

        let gauges = Row::with_children(cells.iter().map(|c| cell_gauge(c, cells, p))).spacing(12);

        let series = vec![Series::new(t.t("charge"), p.green, cells.iter().map(|c| c.charge).collect())];
        let chart = bar_chart(
            BarCfg {
                title: t.t("rb_cells").to_string(),
                y_max: 100.0,
                categories: names(cells, |c| &c.name),
                series,
                unit: "%",
                bar_colors: Some(gauge_colors(p).per_cell(cells)),
                height: CHART_HEIGHT,
            },
            p,
        );

        let decision: Element<Message> = match (maintenance_target(cells), weakest_cell(cells)) {
            (Some(cell), _) => row![
                badge(t.t("maintenance"), p.red),
                text(format!("{} ({:.0}%)", cell.name, cell.charge)).size(12).color(p.text),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
            .into(),
            (None, Some(cell)) => row![
                badge(t.t("good"), p.green),
                text(format!("{} ({:.0}%)", cell.name, cell.charge)).size(12).color(p.label),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
            .into(),
            (None, None) => text(t.t("no_data")).size(12).color(p.label).into(),
        };

        column![
            panel(gauges.into(), p),
            panel(chart, p),
            panel(column![section_title(t.t("decision"), p), decision].spacing(8).into(), p),
        ]
        .spacing(16)
        .into()
    }

    // ─── SECURITY ───────────────────────────────────────────────

    pub(super) fn view_security(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let t = &self.translator;

        let tabs = row![
            menu_tab(t.t("rfid_users"), Message::SecurityTabSelected(SecurityTab::RfidUsers), self.security_tab == SecurityTab::RfidUsers, p),
            menu_tab(t.t("attempts"), Message::SecurityTabSelected(SecurityTab::Attempts), self.security_tab == SecurityTab::Attempts, p),
            menu_tab(t.t("stats"), Message::SecurityTabSelected(SecurityTab::Stats), self.security_tab == SecurityTab::Stats, p),
        ]
        .spacing(6);

        let body: Element<Message> = match self.security_tab {
            SecurityTab::RfidUsers => dataset_view(&self.data.rfid_users, t, p, |users| {
                let rows = users
                    .iter()
                    .map(|u| {
                        let status = if u.is_active() { t.t("active") } else { t.t("inactive") };
                        let actions: Element<Message> = row![
                            link_button(t.t("toggle_status"), Message::ToggleRfidUser(u.id.clone()), p.blue),
                            link_button(t.t("delete"), Message::DeleteRfidUser(u.id.clone()), p.red),
                        ]
                        .spacing(4)
                        .into();
                        vec![
                            mono_cell(&u.id, p.label),
                            cell(&u.name, p),
                            cell(&u.role, p),
                            mono_cell(&u.last_access, p.text),
                            badge(status, status_color(&u.status, p)),
                            actions,
                        ]
                    })
                    .collect();
                let form = &self.rfid_form;
                let add = row![
                    text_input("RFID-006", &form.id).on_input(Message::RfidIdChanged).padding(6),
                    text_input(t.t("name"), &form.name).on_input(Message::RfidNameChanged).padding(6),
                    text_input(t.t("role"), &form.role).on_input(Message::RfidRoleChanged).padding(6),
                    action_button(t.t("add_rfid"), Some(Message::AddRfidUser), p.accent),
                ]
                .spacing(8)
                .align_y(Alignment::Center);
                panel(
                    column![
                        add,
                        table(
                            &[
                                ("ID", 1),
                                (t.t("name"), 3),
                                (t.t("role"), 2),
                                (t.t("last_access"), 3),
                                (t.t("status"), 2),
                                (t.t("actions"), 3),
                            ],
                            rows,
                            p,
                        ),
                    ]
                    .spacing(10)
                    .into(),
                    p,
                )
            }),
            SecurityTab::Attempts => dataset_view(&self.data.alerts, t, p, |alerts| {
                let rows = alerts
                    .iter()
                    .map(|a| {
                        let color = if a.is_critical() { p.red } else { status_color(&a.status, p) };
                        vec![
                            mono_cell(&a.id, p.label),
                            cell(&a.kind, p),
                            cell(&a.zone, p),
                            mono_cell(&a.time, p.text),
                            badge(t.t(&a.status), color),
                        ]
                    })
                    .collect();
                panel(
                    table(
                        &[("ID", 1), (t.t("type"), 3), (t.t("zone"), 2), (t.t("time"), 2), (t.t("status"), 2)],
                        rows,
                        p,
                    ),
                    p,
                )
            }),
            SecurityTab::Stats => dataset_view(&self.data.access_stats, t, p, |stats| {
                let series = vec![
                    Series::new(t.t("authorized"), p.green, stats.iter().map(|s| s.authorized).collect()),
                    Series::new(t.t("unauthorized"), p.red, stats.iter().map(|s| s.unauthorized).collect()),
                ];
                panel(
                    bar_chart(
                        BarCfg {
                            title: t.t("stats").to_string(),
                            y_max: value_range(&series, true).1,
                            categories: names(stats, |s| &s.day),
                            series,
                            unit: "",
                            bar_colors: None,
                            height: CHART_HEIGHT,
                        },
                        p,
                    ),
                    p,
                )
            }),
        };

        column![page_title(t.t("security"), t.t("monitoring"), p), tabs, body]
            .spacing(16)
            .into()
    }

    // ─── MATERIAL ───────────────────────────────────────────────

    pub(super) fn view_material(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let t = &self.translator;

        let counters: Element<Message> = match self.data.inventory.data() {
            Some(items) => {
                let low = items.iter().filter(|i| i.is_low()).count();
                row![
                    stat_card(t.t("total_items"), items.len(), p.blue, p),
                    stat_card(t.t("low_stock_items"), low, if low > 0 { p.red } else { p.green }, p),
                ]
                .spacing(16)
                .into()
            }
            None => Space::new(0, 0).into(),
        };

        let maintenance = dataset_view(&self.data.maintenance, t, p, |items| {
            let rows = items
                .iter()
                .map(|m| {
                    let color = status_color(&m.status, p);
                    vec![
                        cell(&m.name, p),
                        mono_cell(&m.last_maintenance, p.text),
                        mono_cell(&m.next_maintenance, p.text),
                        row![themed_bar(m.progress as f32, color, p.bar_bg), mono_cell(format!("{}%", m.progress), p.label)]
                            .spacing(6)
                            .align_y(Alignment::Center)
                            .into(),
                        badge(t.t(&m.status), color),
                        link_button(t.t("serviced"), Message::ServiceEquipment(m.id.clone()), p.blue),
                    ]
                })
                .collect();
            table(
                &[
                    (t.t("equipment"), 3),
                    (t.t("last_maintenance"), 2),
                    (t.t("next_maintenance"), 2),
                    (t.t("time_left"), 3),
                    (t.t("status"), 2),
                    (t.t("actions"), 2),
                ],
                rows,
                p,
            )
        });

        let inventory = dataset_view(&self.data.inventory, t, p, |items| {
            let rows = items
                .iter()
                .map(|i| {
                    let color = if i.is_low() { p.red } else { status_color(&i.status, p) };
                    let restock: Element<Message> = if i.is_low() {
                        link_button(t.t("restock"), Message::RestockItem(i.id.clone()), p.blue)
                    } else {
                        Space::new(0, 0).into()
                    };
                    vec![
                        cell(&i.name, p),
                        mono_cell(i.stock, color),
                        mono_cell(i.min_stock, p.label),
                        badge(t.t(&i.status), color),
                        restock,
                    ]
                })
                .collect();
            table(
                &[(t.t("name"), 4), (t.t("stock"), 2), (t.t("min_stock"), 2), (t.t("status"), 2), (t.t("actions"), 2)],
                rows,
                p,
            )
        });

        column![
            page_title(t.t("material"), t.t("management"), p),
            counters,
            panel(column![section_title(t.t("maintenance"), p), maintenance].spacing(10).into(), p),
            panel(column![section_title(t.t("inventory"), p), inventory].spacing(10).into(), p),
        ]
        .spacing(16)
        .into()
    }

    // ─── USERS ──────────────────────────────────────────────────

    pub(super) fn view_users(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let t = &self.translator;
        let counts = self.users.counts();

        let counters = row![
            stat_card(t.t("total"), counts.total, p.blue, p),
            stat_card(t.t("superuser"), counts.superusers, p.magenta, p),
            stat_card(t.t("active"), counts.active, p.green, p),
            stat_card(t.t("inactive"), counts.inactive, p.red, p),
        ]
        .spacing(16);

        let form = &self.new_user;
        let create = panel(
            column![
                section_title(t.t("add_user"), p),
                row![
                    text_input(t.t("email"), &form.email).on_input(Message::NewUserEmailChanged).padding(6),
                    text_input(t.t("first_name"), &form.first_name)
                        .on_input(Message::NewUserFirstNameChanged)
                        .padding(6),
                    text_input(t.t("last_name"), &form.last_name)
                        .on_input(Message::NewUserLastNameChanged)
                        .padding(6),
                    checkbox(t.t("superuser"), form.is_superuser)
                        .on_toggle(Message::NewUserSuperuserToggled)
                        .text_size(12),
                    action_button(
                        t.t("submit"),
                        (!self.users.dataset().is_loading()).then_some(Message::CreateUser),
                        p.accent,
                    ),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            ]
            .spacing(10)
            .into(),
            p,
        );

        let list = dataset_view(self.users.dataset(), t, p, |users| {
            if users.is_empty() {
                return text(t.t("no_data")).size(12).color(p.label).into();
            }
            let rows = users
                .iter()
                .map(|u| {
                    let (status, status_c) = if u.is_active { (t.t("active"), p.green) } else { (t.t("inactive"), p.red) };
                    let (kind, kind_c) = if u.is_superuser { (t.t("admin"), p.magenta) } else { (t.t("user"), p.label) };
                    let actions: Element<Message> = row![
                        link_button(t.t("view"), Message::ViewUser(u.id), p.label),
                        link_button(t.t("edit"), Message::ToggleUserActive(u.id), p.blue),
                        link_button(t.t("delete"), Message::DeleteUser(u.id), p.red),
                    ]
                    .spacing(4)
                    .into();
                    vec![
                        mono_cell(u.id, p.label),
                        cell(u.full_name(), p),
                        cell(&u.email, p),
                        badge(kind, kind_c),
                        badge(status, status_c),
                        actions,
                    ]
                })
                .collect();
            table(
                &[
                    (t.t("id"), 1),
                    (t.t("name"), 3),
                    (t.t("email"), 4),
                    (t.t("role"), 2),
                    (t.t("status"), 2),
                    (t.t("actions"), 3),
                ],
                rows,
                p,
            )
        });

        let detail = self.selected_user.as_ref().map(|u| {
            let yes_no = |flag: bool| if flag { t.t("active") } else { t.t("inactive") };
            panel(
                column![
                    row![
                        section_title(t.t("user_details"), p),
                        Space::with_width(Length::Fill),
                        link_button(t.t("cancel"), Message::CloseUserDetail, p.label),
                    ]
                    .align_y(Alignment::Center),
                    info_row(t.t("id"), u.id, p),
                    info_row(t.t("name"), u.full_name(), p),
                    info_row(t.t("email"), &u.email, p),
                    info_row(t.t("status"), yes_no(u.is_active), p),
                    info_row(t.t("superuser"), if u.is_superuser { t.t("admin") } else { t.t("user") }, p),
                ]
                .spacing(6)
                .into(),
                p,
            )
        });

        Column::new()
            .push(page_title(t.t("manage_users"), t.t("platform"), p))
            .push(counters)
            .push(create)
            .push_maybe(detail)
            .push(panel(list, p))
            .spacing(16)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{build_palette, ThemeMode};

    #[test]
    fn test_status_colors() {
        let p = build_palette(ThemeMode::Light);
        assert_eq!(status_color("good", &p), p.green);
        assert_eq!(status_color("attention", &p), p.yellow);
        assert_eq!(status_color("urgent", &p), p.red);
        assert_eq!(status_color("critical", &p), p.red);
        assert_eq!(status_color("something", &p), p.label);
    }

    #[test]
    fn test_frequency_range_is_fixed() {
        assert_eq!(FREQUENCY_RANGE, (49.5, 50.5));
    }
}

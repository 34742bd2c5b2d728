//! Styled building blocks shared by every page.

use iced::widget::canvas::Canvas;
use iced::widget::{button, column, container, progress_bar, row, text, Column, Row, Space};
use iced::{Alignment, Background, Border, Color, Element, Font, Length, Shadow, Theme, Vector};

use super::Message;
use crate::chart::{BarChart, ChartColors, LineChart, Series};
use crate::fetch::Dataset;
use crate::gauge::{CellGauge, GaugeColors};
use crate::models::CellCharge;
use crate::i18n::Translator;
use crate::theme::Palette;

pub fn chart_colors(p: &Palette) -> ChartColors {
    ChartColors {
        bg: p.panel_bg,
        border: p.border,
        grid: p.grid,
        label: p.label,
        text: p.text,
    }
}

pub fn gauge_colors(p: &Palette) -> GaugeColors {
    GaugeColors {
        bg: p.panel_bg,
        label: p.label,
        text: p.text,
        shell: p.label,
        ok: p.green,
        danger: p.red,
    }
}

pub fn panel<'a>(content: Element<'a, Message>, p: &Palette) -> Element<'a, Message> {
    let panel_bg = p.panel_bg;
    let border_c = p.border;
    container(content)
        .width(Length::Fill)
        .padding(12)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(panel_bg)),
            border: Border {
                color: border_c,
                width: 1.0,
                radius: 8.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.08),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        })
        .into()
}

pub fn panel_bg<'a>(content: Element<'a, Message>, bg: Color, border_c: Color) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: border_c,
                width: 1.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
}

pub fn section_title(label: impl ToString, p: &Palette) -> Element<'static, Message> {
    text(label.to_string()).size(13).color(p.text).into()
}

pub fn page_title(title: impl ToString, subtitle: impl ToString, p: &Palette) -> Element<'static, Message> {
    column![
        text(title.to_string()).size(22).color(p.text),
        text(subtitle.to_string()).size(12).color(p.label),
    ]
    .spacing(2)
    .into()
}

pub fn info_row<'a>(label: impl ToString, value: impl ToString, p: &Palette) -> Element<'a, Message> {
    let l = format!("{}:", label.to_string());
    let v = value.to_string();
    row![
        text(l).size(12).color(p.label).width(140),
        text(v).size(12).font(Font::MONOSPACE).color(p.text),
    ]
    .spacing(8)
    .into()
}

/// Sidebar navigation entry. Collapsed entries show only their initial.
pub fn sidebar_item(
    label: &str,
    on_press: Message,
    is_active: bool,
    collapsed: bool,
    p: &Palette,
) -> Element<'static, Message> {
    let accent = p.accent;
    let sidebar_bg = p.sidebar_bg;
    let hover_bg = Color::from_rgba(accent.r, accent.g, accent.b, 0.12);
    let active_bg = Color::from_rgba(accent.r, accent.g, accent.b, 0.2);
    let text_c = if is_active { accent } else { p.text };
    let shown = if collapsed {
        label.chars().next().map(String::from).unwrap_or_default()
    } else {
        label.to_string()
    };

    button(text(shown).size(13).color(text_c))
        .on_press(on_press)
        .width(Length::Fill)
        .padding([8, 12])
        .style(move |_: &Theme, status| {
            let bg = match status {
                button::Status::Hovered => if is_active { active_bg } else { hover_bg },
                button::Status::Pressed => active_bg,
                _ => if is_active { active_bg } else { sidebar_bg },
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: text_c,
                border: Border {
                    color: if is_active { accent } else { Color::TRANSPARENT },
                    width: if is_active { 1.5 } else { 0.0 },
                    radius: 6.0.into(),
                },
                shadow: Shadow::default(),
            }
        })
        .into()
}

pub fn menu_tab(label: &str, on_press: Message, is_active: bool, p: &Palette) -> Element<'static, Message> {
    let accent = p.accent;
    let label_c = p.label;
    let text_c = p.text;
    let color = if is_active { accent } else { label_c };
    let hover_color = Color::from_rgba(accent.r, accent.g, accent.b, 0.15);
    button(text(label.to_string()).size(12).color(color))
        .on_press(on_press)
        .padding([5, 14])
        .style(move |_: &Theme, status| {
            let bg = match status {
                button::Status::Hovered => hover_color,
                button::Status::Pressed => Color::from_rgba(accent.r, accent.g, accent.b, 0.25),
                _ => if is_active { Color::from_rgba(accent.r, accent.g, accent.b, 0.1) } else { Color::TRANSPARENT },
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: text_c,
                border: Border {
                    color: if is_active { accent } else { Color::TRANSPARENT },
                    width: if is_active { 1.0 } else { 0.0 },
                    radius: 6.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

/// Filled action button. `None` renders it disabled.
pub fn action_button(label: &str, on_press: Option<Message>, color: Color) -> Element<'static, Message> {
    let hover = Color::from_rgba(color.r, color.g, color.b, 0.85);
    button(text(label.to_string()).size(12).color(Color::WHITE))
        .on_press_maybe(on_press)
        .padding([6, 14])
        .style(move |_: &Theme, status| {
            let bg = match status {
                button::Status::Hovered => hover,
                button::Status::Disabled => Color::from_rgba(color.r, color.g, color.b, 0.4),
                _ => color,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: Color::WHITE,
                border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 6.0.into() },
                ..Default::default()
            }
        })
        .into()
}

/// Borderless text button, as used for row actions.
pub fn link_button(label: &str, on_press: Message, color: Color) -> Element<'static, Message> {
    button(text(label.to_string()).size(12).color(color))
        .on_press(on_press)
        .style(button::text)
        .padding([2, 6])
        .into()
}

/// Small rounded status pill.
pub fn badge(label: impl ToString, color: Color) -> Element<'static, Message> {
    container(text(label.to_string()).size(11).color(color))
        .padding([2, 8])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(Color::from_rgba(color.r, color.g, color.b, 0.15))),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 10.0.into() },
            ..Default::default()
        })
        .into()
}

/// Counter card: label over a large value.
pub fn stat_card(label: impl ToString, value: impl ToString, color: Color, p: &Palette) -> Element<'static, Message> {
    panel(
        column![
            text(label.to_string()).size(12).color(p.label),
            text(value.to_string()).size(24).font(Font::MONOSPACE).color(color),
        ]
        .spacing(4)
        .into(),
        p,
    )
}

pub fn themed_bar(value: f32, color: Color, bar_bg: Color) -> Element<'static, Message> {
    let bar_color = Color::from_rgba(
        (color.r * 0.9 + 0.1).min(1.0),
        (color.g * 0.9 + 0.1).min(1.0),
        (color.b * 0.9 + 0.1).min(1.0),
        color.a,
    );
    progress_bar(0.0..=100.0, value)
        .width(Length::Fill)
        .height(8)
        .style(move |_: &Theme| progress_bar::Style {
            background: Background::Color(bar_bg),
            bar: Background::Color(bar_color),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 4.0.into() },
        })
        .into()
}

/// Header row plus data rows, columns sized by fill portion.
pub fn table<'a>(
    headers: &[(&str, u16)],
    rows: Vec<Vec<Element<'a, Message>>>,
    p: &Palette,
) -> Element<'a, Message> {
    let border_c = p.border;
    let header = Row::with_children(
        headers
            .iter()
            .map(|(h, portion)| {
                container(text(h.to_string()).size(11).color(p.label))
                    .width(Length::FillPortion(*portion))
                    .into()
            }),
    )
    .padding([6, 8]);

    let mut body = Column::new().push(header).push(divider(border_c));
    for cells in rows {
        let line = Row::with_children(
            cells
                .into_iter()
                .zip(headers.iter())
                .map(|(cell, (_, portion))| container(cell).width(Length::FillPortion(*portion)).into()),
        )
        .align_y(Alignment::Center)
        .padding([6, 8]);
        body = body.push(line).push(divider(border_c));
    }
    body.into()
}

pub fn cell(value: impl ToString, p: &Palette) -> Element<'static, Message> {
    text(value.to_string()).size(12).color(p.text).into()
}

pub fn mono_cell(value: impl ToString, color: Color) -> Element<'static, Message> {
    text(value.to_string()).size(12).font(Font::MONOSPACE).color(color).into()
}

fn divider(color: Color) -> Element<'static, Message> {
    container(Space::new(Length::Fill, 1))
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(color)),
            ..Default::default()
        })
        .into()
}

pub struct LineCfg {
    pub title: String,
    pub series: Vec<Series>,
    pub categories: Vec<String>,
    pub y_range: (f32, f32),
    pub filled: bool,
    pub unit: &'static str,
    pub height: f32,
}

pub fn line_chart(cfg: LineCfg, p: &Palette) -> Element<'static, Message> {
    let chart = LineChart {
        series: cfg.series,
        categories: cfg.categories,
        y_min: cfg.y_range.0,
        y_max: cfg.y_range.1,
        title: cfg.title,
        filled: cfg.filled,
        unit: cfg.unit.to_string(),
        colors: chart_colors(p),
    };
    Canvas::new(chart)
        .width(Length::Fill)
        .height(Length::Fixed(cfg.height))
        .into()
}

pub struct BarCfg {
    pub title: String,
    pub series: Vec<Series>,
    pub categories: Vec<String>,
    pub y_max: f32,
    pub unit: &'static str,
    pub bar_colors: Option<Vec<Color>>,
    pub height: f32,
}

pub fn bar_chart(cfg: BarCfg, p: &Palette) -> Element<'static, Message> {
    let chart = BarChart {
        series: cfg.series,
        categories: cfg.categories,
        y_max: cfg.y_max,
        title: cfg.title,
        unit: cfg.unit.to_string(),
        colors: chart_colors(p),
        bar_colors: cfg.bar_colors,
    };
    Canvas::new(chart)
        .width(Length::Fill)
        .height(Length::Fixed(cfg.height))
        .into()
}

/// Battery gauge for `cell`, flagged when it is the maintenance target among `cells`.
pub fn cell_gauge(cell: &CellCharge, cells: &[CellCharge], p: &Palette) -> Element<'static, Message> {
    Canvas::new(CellGauge::new(cell, cells, gauge_colors(p)))
        .width(Length::Fill)
        .height(Length::Fixed(130.0))
        .into()
}

/// Body of a dataset-backed panel: a loading line, or the rendered data with a
/// sample-data marker when the live fetch failed.
pub fn dataset_view<'a, T>(
    dataset: &'a Dataset<T>,
    t: &Translator,
    p: &Palette,
    render: impl FnOnce(&'a T) -> Element<'a, Message>,
) -> Element<'a, Message> {
    match dataset {
        Dataset::Loading => container(text(t.t("loading").to_string()).size(12).color(p.label))
            .padding(20)
            .center_x(Length::Fill)
            .into(),
        Dataset::Live(data) => render(data),
        Dataset::Fallback(data) => column![
            row![Space::with_width(Length::Fill), badge(t.t("sample_data"), p.yellow)],
            render(data),
        ]
        .spacing(6)
        .into(),
    }
}

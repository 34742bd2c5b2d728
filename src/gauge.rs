//! RB cell charge rules and the battery gauge that draws one cell.

use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Font, Point, Rectangle, Renderer, Size, Theme};

use crate::models::CellCharge;

/// Cells at or below this charge, percent, need attention.
pub const RB_CHARGE_THRESHOLD: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLevel {
    Ok,
    Low,
}

impl CellLevel {
    /// NaN readings count as low.
    pub fn of(charge: f32) -> Self {
        if charge > RB_CHARGE_THRESHOLD {
            CellLevel::Ok
        } else {
            CellLevel::Low
        }
    }
}

/// The cell with the lowest charge, ignoring NaN readings.
pub fn weakest_cell(cells: &[CellCharge]) -> Option<&CellCharge> {
    cells
        .iter()
        .filter(|c| c.charge.is_finite())
        .min_by(|a, b| a.charge.total_cmp(&b.charge))
}

/// The cell maintenance should start with: the weakest one, if it is low.
pub fn maintenance_target(cells: &[CellCharge]) -> Option<&CellCharge> {
    weakest_cell(cells).filter(|c| CellLevel::of(c.charge) == CellLevel::Low)
}

/// Palette slice used by the cell gauges and charge bars.
#[derive(Debug, Clone, Copy)]
pub struct GaugeColors {
    pub bg: Color,
    pub label: Color,
    pub text: Color,
    pub shell: Color,
    pub ok: Color,
    pub danger: Color,
}

impl GaugeColors {
    pub fn level(&self, level: CellLevel) -> Color {
        match level {
            CellLevel::Ok => self.ok,
            CellLevel::Low => self.danger,
        }
    }

    /// Bar colour per cell, in order.
    pub fn per_cell(&self, cells: &[CellCharge]) -> Vec<Color> {
        cells.iter().map(|c| self.level(CellLevel::of(c.charge))).collect()
    }
}

/// One RB cell drawn as a battery whose fill follows the charge.
#[derive(Debug, Clone)]
pub struct CellGauge {
    pub name: String,
    pub charge: f32,
    /// Flag this cell as the maintenance target.
    pub flagged: bool,
    pub colors: GaugeColors,
}

impl CellGauge {
    pub fn new(cell: &CellCharge, cells: &[CellCharge], colors: GaugeColors) -> Self {
        let flagged = maintenance_target(cells).is_some_and(|target| std::ptr::eq(target, cell));
        Self { name: cell.name.clone(), charge: cell.charge, flagged, colors }
    }

    fn fill_fraction(&self) -> f32 {
        if self.charge.is_finite() {
            (self.charge / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn charge_label(&self) -> String {
        if self.charge.is_finite() {
            format!("{:.0}%", self.charge)
        } else {
            "-".to_string()
        }
    }
}

impl<Message: 'static> canvas::Program<Message> for CellGauge {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let c = &self.colors;
        frame.fill(&Path::rectangle(Point::ORIGIN, bounds.size()), c.bg);

        let fill_color = c.level(CellLevel::of(self.charge));

        // Battery body, upright, with the terminal on top.
        let body_w = (bounds.width * 0.32).clamp(24.0, 48.0);
        let body_h = (bounds.height - 44.0).max(30.0);
        let body = Point::new((bounds.width - body_w) / 2.0, 14.0);
        let cap_w = body_w * 0.4;
        frame.fill(
            &Path::rectangle(Point::new(body.x + (body_w - cap_w) / 2.0, body.y - 5.0), Size::new(cap_w, 5.0)),
            c.shell,
        );
        frame.stroke(
            &Path::rectangle(body, Size::new(body_w, body_h)),
            Stroke::default().with_color(c.shell).with_width(2.0),
        );

        let inset = 3.0;
        let inner_h = body_h - inset * 2.0;
        let level_h = inner_h * self.fill_fraction();
        if level_h > 0.5 {
            frame.fill(
                &Path::rectangle(
                    Point::new(body.x + inset, body.y + inset + inner_h - level_h),
                    Size::new(body_w - inset * 2.0, level_h),
                ),
                fill_color,
            );
        }

        // Threshold tick on the shell.
        let tick_y = body.y + inset + inner_h * (1.0 - RB_CHARGE_THRESHOLD / 100.0);
        frame.stroke(
            &Path::line(Point::new(body.x - 4.0, tick_y), Point::new(body.x, tick_y)),
            Stroke::default().with_color(c.danger).with_width(1.5),
        );

        let mut value = Text::from(self.charge_label());
        value.position = Point::new(bounds.width / 2.0, body.y + body_h / 2.0);
        value.color = c.text;
        value.size = 12.0.into();
        value.font = Font::MONOSPACE;
        value.horizontal_alignment = iced::alignment::Horizontal::Center;
        value.vertical_alignment = iced::alignment::Vertical::Center;
        frame.fill_text(value);

        let mut name = Text::from(if self.flagged { format!("! {}", self.name) } else { self.name.clone() });
        name.position = Point::new(bounds.width / 2.0, body.y + body_h + 14.0);
        name.color = if self.flagged { c.danger } else { c.label };
        name.size = 11.0.into();
        name.horizontal_alignment = iced::alignment::Horizontal::Center;
        name.vertical_alignment = iced::alignment::Vertical::Center;
        frame.fill_text(name);

        vec![frame.into_geometry()]
    }
}

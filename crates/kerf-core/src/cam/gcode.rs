//! Fanuc-dialect G-code emission: the single boundary where
//! SDF Y-up toolpath points are remapped to CNC Z-up axes, with
//! modal-optimised motion output.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::toolpath::{MotionKind, ToolpathPoint, ToolpathResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coolant {
    Flood,
    Mist,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStyle {
    Paren,
    Semicolon,
}

/// Configuration for [`emit_fanuc_gcode`]. The core performs no I/O or
/// system-clock reads, so `date` is supplied by the caller rather than
/// read from the system clock here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GCodeConfig {
    pub program_number: u32,
    pub work_offset: String,
    pub coolant: Coolant,
    pub comment_style: CommentStyle,
    pub decimal_places: usize,
    pub line_numbers: bool,
    pub rapid_rate: f64,
    pub date: Option<String>,
}

impl Default for GCodeConfig {
    fn default() -> Self {
        Self {
            program_number: 1001,
            work_offset: "G54".to_string(),
            coolant: Coolant::Flood,
            comment_style: CommentStyle::Paren,
            decimal_places: 3,
            line_numbers: false,
            rapid_rate: 15000.0,
            date: None,
        }
    }
}

impl GCodeConfig {
    pub fn with_program_number(mut self, n: u32) -> Self {
        self.program_number = n;
        self
    }

    pub fn with_work_offset(mut self, offset: impl Into<String>) -> Self {
        self.work_offset = offset.into();
        self
    }

    pub fn with_coolant(mut self, coolant: Coolant) -> Self {
        self.coolant = coolant;
        self
    }

    pub fn with_comment_style(mut self, style: CommentStyle) -> Self {
        self.comment_style = style;
        self
    }

    pub fn with_decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = places;
        self
    }

    pub fn with_line_numbers(mut self, on: bool) -> Self {
        self.line_numbers = on;
        self
    }

    pub fn with_rapid_rate(mut self, rate: f64) -> Self {
        self.rapid_rate = rate;
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    fn comment(&self, text: &str) -> String {
        match self.comment_style {
            CommentStyle::Paren => format!("({text})"),
            CommentStyle::Semicolon => format!("; {text}"),
        }
    }
}

fn is_valid_work_offset(offset: &str) -> bool {
    let bytes = offset.as_bytes();
    bytes.len() == 3 && bytes[0] == b'G' && bytes[1] == b'5' && (b'4'..=b'9').contains(&bytes[2])
}

/// `value.toFixed(decimal_places)`, trailing zeros stripped, with a
/// guaranteed trailing `.` so the control reads the token as a real.
fn format_number(value: f64, decimal_places: usize) -> String {
    let formatted = format!("{value:.decimal_places$}");
    if formatted.contains('.') {
        let mut s = formatted;
        while s.ends_with('0') {
            s.pop();
        }
        s
    } else {
        format!("{formatted}.")
    }
}

struct ModalState {
    decimal_places: usize,
    last_g: Option<&'static str>,
    last_x: Option<String>,
    last_y: Option<String>,
    last_z: Option<String>,
    last_feed_cut: Option<String>,
    last_feed_plunge: Option<String>,
}

impl ModalState {
    fn new(decimal_places: usize) -> Self {
        Self {
            decimal_places,
            last_g: None,
            last_x: None,
            last_y: None,
            last_z: None,
            last_feed_cut: None,
            last_feed_plunge: None,
        }
    }

    /// Remaps `point` from the kernel's Y-up convention to CNC Z-up
    /// (`X = point.x`, `Y = point.z`, `Z = point.y`) and produces one
    /// motion line, or `None` if every coordinate is unchanged — a line with
    /// no coordinates is omitted outright, even if G or F would otherwise
    /// have changed.
    fn line(&mut self, point: &ToolpathPoint, feed_rate: f64, plunge_rate: f64) -> Option<String> {
        let (g, feed) = match point.kind {
            MotionKind::Rapid => ("G00", None),
            MotionKind::Cut => ("G01", Some(feed_rate)),
            MotionKind::Plunge => ("G01", Some(plunge_rate)),
        };

        let x = format_number(point.x, self.decimal_places);
        let y = format_number(point.z, self.decimal_places);
        let z = format_number(point.y, self.decimal_places);

        let x_changed = self.last_x.as_deref() != Some(x.as_str());
        let y_changed = self.last_y.as_deref() != Some(y.as_str());
        let z_changed = self.last_z.as_deref() != Some(z.as_str());
        if !x_changed && !y_changed && !z_changed {
            return None;
        }

        let mut words = Vec::new();
        if self.last_g != Some(g) {
            words.push(g.to_string());
        }
        if x_changed {
            words.push(format!("X{x}"));
        }
        if y_changed {
            words.push(format!("Y{y}"));
        }
        if z_changed {
            words.push(format!("Z{z}"));
        }
        if let Some(feed_value) = feed {
            let feed_str = format_number(feed_value, 0);
            let tracker = match point.kind {
                MotionKind::Cut => &mut self.last_feed_cut,
                MotionKind::Plunge => &mut self.last_feed_plunge,
                MotionKind::Rapid => unreachable!(),
            };
            if tracker.as_deref() != Some(feed_str.as_str()) {
                words.push(format!("F{}", feed_value.round() as i64));
                *tracker = Some(feed_str);
            }
        }

        self.last_g = Some(g);
        self.last_x = Some(x);
        self.last_y = Some(y);
        self.last_z = Some(z);
        if matches!(point.kind, MotionKind::Rapid) {
            self.last_feed_cut = None;
            self.last_feed_plunge = None;
        }

        Some(words.join(" "))
    }
}

/// Emit a Fanuc-dialect G-code program for `toolpath`. Coordinates
/// are remapped at this boundary only; everywhere else in the kernel,
/// points stay in the native Y-up convention.
pub fn emit_fanuc_gcode(toolpath: &ToolpathResult, config: &GCodeConfig) -> Result<String> {
    if !is_valid_work_offset(&config.work_offset) {
        return Err(Error::invalid_parameter(
            "emit_fanuc_gcode",
            "work_offset",
            &config.work_offset,
        ));
    }
    let feed_rate = toolpath.parameters.feed_rate();
    let plunge_rate = toolpath.parameters.plunge_rate();
    let rpm = toolpath.parameters.rpm();
    let safe_z = toolpath.parameters.safe_z();
    if !(1.0..=99999.0).contains(&feed_rate) {
        return Err(Error::invalid_parameter("emit_fanuc_gcode", "feed_rate", feed_rate));
    }
    if !(1.0..=99999.0).contains(&rpm) {
        return Err(Error::invalid_parameter("emit_fanuc_gcode", "rpm", rpm));
    }
    if safe_z < 0.0 {
        return Err(Error::invalid_parameter("emit_fanuc_gcode", "safe_z", safe_z));
    }
    if toolpath.points.is_empty() {
        return Err(Error::state_violation(
            "emit_fanuc_gcode",
            "toolpath has no points",
        ));
    }

    let mut lines: Vec<String> = Vec::new();
    let mut line_no = 10u32;
    let mut push = |lines: &mut Vec<String>, text: String| {
        if config.line_numbers {
            lines.push(format!("N{line_no} {text}"));
            line_no += 10;
        } else {
            lines.push(text);
        }
    };

    push(&mut lines, "%".to_string());
    push(
        &mut lines,
        format!(
            "O{:04} {}",
            config.program_number,
            config.comment("BALL NOSE SURFACING")
        ),
    );
    push(
        &mut lines,
        config.comment(&format!(
            "TOOL: {} DIA {}",
            toolpath.tool.name,
            format_number(toolpath.tool.diameter(), config.decimal_places)
        )),
    );
    push(&mut lines, config.comment(&format!("PART: {}", toolpath.shape_name)));
    if let Some(date) = &config.date {
        push(&mut lines, config.comment(&format!("DATE: {date}")));
    }
    push(
        &mut lines,
        config.comment(&format!(
            "STEPOVER {}% FEED {} RPM {}",
            toolpath.parameters.stepover_pct(),
            feed_rate,
            rpm
        )),
    );
    let estimated_minutes = ((toolpath.statistics.cut_distance / feed_rate
        + toolpath.statistics.rapid_distance / config.rapid_rate)
        * 100.0)
        .round()
        / 100.0;
    push(
        &mut lines,
        config.comment(&format!("EST RUNTIME {estimated_minutes} MIN")),
    );

    push(&mut lines, "G90 G21 G17".to_string());
    push(
        &mut lines,
        format!(
            "G00 {} X0. Y0. Z{}",
            config.work_offset,
            format_number(safe_z, config.decimal_places)
        ),
    );
    push(&mut lines, format!("M03 S{}", rpm.round() as i64));
    match config.coolant {
        Coolant::Flood => push(&mut lines, "M08".to_string()),
        Coolant::Mist => push(&mut lines, "M07".to_string()),
        Coolant::Off => {}
    }

    let mut modal = ModalState::new(config.decimal_places);
    for point in &toolpath.points {
        if let Some(line) = modal.line(point, feed_rate, plunge_rate) {
            push(&mut lines, line);
        }
    }

    push(&mut lines, "M05".to_string());
    if config.coolant != Coolant::Off {
        push(&mut lines, "M09".to_string());
    }
    push(&mut lines, "G00 G53 Z0.".to_string());
    push(&mut lines, "M30".to_string());
    push(&mut lines, "%".to_string());

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cam::tool::ToolDefinition;
    use crate::cam::toolpath::{generate_raster_surfacing, RasterDirection, SurfacingParams};
    use crate::sdf::box3;

    fn sample_toolpath() -> ToolpathResult {
        let shape = box3(100.0, 60.0, 30.0).unwrap();
        let tool = ToolDefinition::ball_nose("ballnose6", 10.0).unwrap();
        let params = SurfacingParams::new(RasterDirection::X, 50.0, 2000.0, 10000.0, 50.0, 20.0, 100.0, -100.0)
            .unwrap()
            .with_point_spacing(20.0)
            .unwrap();
        generate_raster_surfacing(&shape, "box", &tool, &params).unwrap()
    }

    #[test]
    fn emits_required_tokens_and_tape_markers() {
        let toolpath = sample_toolpath();
        let gcode = emit_fanuc_gcode(&toolpath, &GCodeConfig::default()).unwrap();
        let lines: Vec<&str> = gcode.lines().collect();
        assert_eq!(lines.first(), Some(&"%"));
        assert_eq!(lines.last(), Some(&"%"));
        assert!(gcode.contains("O1001"));
        assert!(gcode.contains("BALL NOSE SURFACING"));
        assert!(gcode.contains("M03 S10000"));
        assert!(gcode.contains("F2000"));
        assert!(gcode.contains("F667"));
        assert_eq!(gcode.matches("M30").count(), 1);
    }

    #[test]
    fn modal_optimisation_drops_unchanged_coordinates() {
        let toolpath = sample_toolpath();
        let cutting_points = toolpath
            .points
            .iter()
            .filter(|p| p.kind != MotionKind::Rapid)
            .count();
        let gcode = emit_fanuc_gcode(&toolpath, &GCodeConfig::default()).unwrap();
        let g01_tokens = gcode.matches("G01").count();
        assert!(g01_tokens < cutting_points);

        // within a strip the secondary (Z->Y) coordinate is constant, so
        // most cutting lines omit the Y word entirely.
        let y_omitted = gcode.lines().filter(|l| l.contains("G01") && !l.contains('Y')).count();
        assert!(y_omitted > 0);
    }

    #[test]
    fn rapid_rate_affects_estimated_runtime() {
        let toolpath = sample_toolpath();
        let slow = GCodeConfig::default().with_rapid_rate(1.0);
        let fast = GCodeConfig::default().with_rapid_rate(1.0e9);
        let slow_gcode = emit_fanuc_gcode(&toolpath, &slow).unwrap();
        let fast_gcode = emit_fanuc_gcode(&toolpath, &fast).unwrap();
        assert_ne!(
            slow_gcode.lines().find(|l| l.contains("EST RUNTIME")),
            fast_gcode.lines().find(|l| l.contains("EST RUNTIME")),
        );
    }

    #[test]
    fn rejects_invalid_work_offset() {
        let toolpath = sample_toolpath();
        let config = GCodeConfig::default().with_work_offset("G99");
        assert!(emit_fanuc_gcode(&toolpath, &config).is_err());
    }

    #[test]
    fn rejects_out_of_range_feed() {
        let shape = box3(10.0, 10.0, 10.0).unwrap();
        let tool = ToolDefinition::ball_nose("t", 4.0).unwrap();
        let params = SurfacingParams::new(RasterDirection::X, 50.0, 200000.0, 10000.0, 10.0, 5.0, 10.0, -10.0).unwrap();
        let toolpath = generate_raster_surfacing(&shape, "cube", &tool, &params).unwrap();
        assert!(emit_fanuc_gcode(&toolpath, &GCodeConfig::default()).is_err());
    }
}

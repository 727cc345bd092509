//! Small helpers shared by the chart and popup writers.

/// Escapes text for use in SVG/HTML content and attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub fn num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Lets a rendered chart stretch to its container width. The fixed
/// height and the viewBox keep the aspect ratio.
pub fn responsive(svg: String, width: u32, height: u32) -> String {
    let needle = format!(r#"width="{width}" height="{height}""#);
    if !svg.contains(&needle) {
        return svg;
    }

    let sized = if svg.contains("viewBox") {
        format!(r#"width="100%" height="{height}""#)
    } else {
        format!(r#"width="100%" height="{height}" viewBox="0 0 {width} {height}""#)
    };
    svg.replacen(&needle, &sized, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn trims_numbers() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(2.50), "2.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(1.234), "1.23");
    }

    #[test]
    fn stretches_to_the_container_width() {
        let svg = r#"<svg width="400" height="350" xmlns="http://www.w3.org/2000/svg"></svg>"#;
        assert_eq!(
            responsive(svg.to_string(), 400, 350),
            r#"<svg width="100%" height="350" viewBox="0 0 400 350" xmlns="http://www.w3.org/2000/svg"></svg>"#
        );
        assert_eq!(responsive(String::new(), 400, 350), "");
    }
}

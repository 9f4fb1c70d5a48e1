//! Server-rendered HTML for the prediction form.

use std::fmt::Write;

use crate::features::{Feature, FeatureRow};
use crate::models::{FlightForm, PredictionResult};

const MISSING_MODEL_WARNING: &str =
    "The application cannot make predictions because the model files are missing.";

/// Form layout: two columns of widgets.
const LEFT_COLUMN: [Feature; 5] = [
    Feature::CarrierCode,
    Feature::OriginAirport,
    Feature::ScheduledDepartureTime,
    Feature::Month,
    Feature::DayOfMonth,
];
const RIGHT_COLUMN: [Feature; 4] = [
    Feature::DestinationAirport,
    Feature::DistanceMiles,
    Feature::DepartureDelayMinutes,
    Feature::DayOfWeek,
];

/// Everything the landing page may show.
pub struct Page<'a> {
    pub form: &'a FlightForm,
    pub model_available: bool,
    pub error: Option<String>,
    pub result: Option<(&'a PredictionResult, &'a FeatureRow)>,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `(input type, extra attributes, help text)` for a field's widget.
fn widget(feature: Feature) -> (&'static str, &'static str, Option<&'static str>) {
    match feature {
        Feature::Month => ("number", r#"min="1" max="12" step="1""#, None),
        Feature::DayOfMonth => ("number", r#"min="1" max="31" step="1""#, None),
        Feature::DayOfWeek => ("number", r#"min="1" max="7" step="1""#, Some("1=Monday, 7=Sunday")),
        Feature::CarrierCode => ("text", r#"maxlength="3""#, Some("e.g., WN, DL, AA")),
        Feature::OriginAirport => ("text", r#"maxlength="4""#, Some("e.g., LAX, JFK, ORD")),
        Feature::DestinationAirport => ("text", r#"maxlength="4""#, Some("e.g., SFO, MIA, DFW")),
        Feature::ScheduledDepartureTime => ("number", r#"min="0" max="2359" step="1""#, None),
        Feature::DepartureDelayMinutes => (
            "number",
            r#"step="0.1""#,
            Some("Use a negative number for early departures."),
        ),
        Feature::DistanceMiles => ("number", r#"min="0" step="0.1""#, None),
    }
}

fn render_field(out: &mut String, feature: Feature, form: &FlightForm, disabled: bool) {
    let (kind, attrs, help) = widget(feature);
    let name = feature.column_name();
    let _ = write!(
        out,
        r#"<label for="{name}">{label}</label><input id="{name}" name="{name}" type="{kind}" {attrs} value="{value}" required{disabled}>"#,
        label = feature.label(),
        value = escape(form.value(feature)),
        disabled = if disabled { " disabled" } else { "" },
    );
    if let Some(help) = help {
        let _ = write!(out, r#"<small>{help}</small>"#);
    }
}

fn render_result(out: &mut String, result: &PredictionResult, row: &FeatureRow) {
    let (class, headline) = if result.delayed {
        ("delayed", "Prediction: Flight will be DELAYED")
    } else {
        ("on-time", "Prediction: Flight will be ON TIME")
    };
    let confidence = result.confidence() * 100.0;
    let _ = write!(
        out,
        r#"<section class="result {class}"><h2>Prediction Result</h2><p><strong>{headline}</strong></p><p class="metric">Confidence: {confidence:.2}%</p><progress max="100" value="{confidence:.2}"></progress>"#,
    );

    out.push_str("<details><summary>Show Input Data</summary><table><tr>");
    for (feature, _) in row.entries() {
        let _ = write!(out, "<th>{}</th>", feature.column_name());
    }
    out.push_str("</tr><tr>");
    for (_, value) in row.entries() {
        let _ = write!(out, "<td>{}</td>", escape(&value.to_string()));
    }
    out.push_str("</tr></table></details></section>");
}

pub fn render(page: &Page<'_>) -> String {
    let disabled = !page.model_available;
    let mut out = String::with_capacity(4096);
    out.push_str(HEAD);

    if disabled {
        let _ = write!(out, r#"<div class="warning">{}</div>"#, MISSING_MODEL_WARNING);
    }
    if let Some(error) = &page.error {
        let _ = write!(out, r#"<div class="error">{}</div>"#, escape(error));
    }

    out.push_str(r#"<form method="post" action="/"><h2>Flight Details</h2><div class="columns">"#);
    for column in [&LEFT_COLUMN[..], &RIGHT_COLUMN[..]] {
        out.push_str(r#"<div class="column">"#);
        for feature in column {
            render_field(&mut out, *feature, page.form, disabled);
        }
        out.push_str("</div>");
    }
    let _ = write!(
        out,
        r#"</div><button type="submit"{}>Predict Delay</button></form>"#,
        if disabled { " disabled" } else { "" }
    );

    if let Some((result, row)) = page.result {
        render_result(&mut out, result, row);
    }

    out.push_str(FOOT);
    out
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Flight Delay Predictor</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
        .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
        .column { display: flex; flex-direction: column; gap: 0.35rem; }
        label { font-weight: 600; margin-top: 0.5rem; }
        small { color: #616e7c; }
        button { margin-top: 1.5rem; padding: 0.6rem 1.4rem; }
        .warning { background: #fff3c4; padding: 0.8rem; border-radius: 6px; }
        .error { background: #ffe3e3; padding: 0.8rem; border-radius: 6px; }
        .result { margin-top: 2rem; padding: 1rem; border-radius: 6px; }
        .result.delayed { background: #ffe3e3; }
        .result.on-time { background: #e3f9e5; }
        progress { width: 100%; }
        table { border-collapse: collapse; margin-top: 0.5rem; }
        th, td { border: 1px solid #cbd2d9; padding: 0.25rem 0.5rem; font-size: 0.85rem; }
    </style>
</head>
<body>
    <h1>Flight Delay Predictor</h1>
    <p>Enter the flight details below to predict whether a flight will be delayed by 15 minutes or more.</p>
"#;

const FOOT: &str = "\n</body>\n</html>\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ColumnOrder;
    use crate::models::FeatureSet;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b a="1">&'"#), "&lt;b a=&quot;1&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_unavailable_page_disables_submit() {
        let form = FlightForm::default();
        let html = render(&Page {
            form: &form,
            model_available: false,
            error: None,
            result: None,
        });
        assert!(html.contains(MISSING_MODEL_WARNING));
        assert!(html.contains(r#"<button type="submit" disabled>"#));
    }

    #[test]
    fn test_result_echoes_input() {
        let form = FlightForm::default();
        let set = FeatureSet {
            month: 1,
            day_of_month: 15,
            day_of_week: 3,
            carrier_code: "WN".into(),
            origin_airport: "LAX".into(),
            destination_airport: "SFO".into(),
            scheduled_departure_time: 1400,
            departure_delay_minutes: -5.0,
            distance_miles: 337.0,
        };
        let row = set.to_row(&ColumnOrder::from_features(Feature::ALL.to_vec()).unwrap());
        let result = PredictionResult {
            delayed: false,
            confidence_on_time: 0.8123,
            confidence_delayed: 0.1877,
        };
        let html = render(&Page {
            form: &form,
            model_available: true,
            error: None,
            result: Some((&result, &row)),
        });
        assert!(html.contains("Flight will be ON TIME"));
        assert!(html.contains("Confidence: 81.23%"));
        assert!(html.contains("<th>op_unique_carrier</th>"));
        assert!(html.contains("<td>-5.0</td>"));
        assert!(html.contains(r#"<button type="submit">"#));
    }
}

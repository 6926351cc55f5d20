use maud::{html, Markup, DOCTYPE};

/// Index page listing the available routes
pub fn home_page(api_base: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Climate API" }
            }
            body {
                h1 { "Welcome to the Climate API!" }
                p { "Available routes:" }
                ul {
                    li {
                        a href={ (api_base) "/api/v1.0/precipitation" } { "/api/v1.0/precipitation" }
                        " - precipitation for the last 12 months"
                    }
                    li {
                        a href={ (api_base) "/api/v1.0/stations" } { "/api/v1.0/stations" }
                        " - list of stations"
                    }
                    li {
                        a href={ (api_base) "/api/v1.0/tobs" } { "/api/v1.0/tobs" }
                        " - temperature observations for the most active station (last 12 months)"
                    }
                    li {
                        "/api/v1.0/{start} - temperature statistics from a start date"
                    }
                    li {
                        "/api/v1.0/{start}/{end} - temperature statistics for a date range"
                    }
                }
                p {
                    a href={ (api_base) "/docs" } { "API docs" }
                }
            }
        }
    }
}

use anyhow::Result;
use httpmock::prelude::*;
use tempfile::TempDir;
use zodiac_etl::{EtlEngine, EtlError, LocalStorage, TomlConfig, WikipediaSource, ZodiacPipeline};

const ZODIAC_TABLE: &str = "\
Sternzeichen | Zeitraum
-------------|---------
Widder | 21.03 - 19.04
Stier | 20.04 - 20.05
Zwillinge | 21.05 - 20.06
Krebs | 21.06 - 22.07
Löwe | 23.07 - 22.08
Jungfrau | 23.08 - 22.09
Waage | 23.09 - 22.10
Skorpion | 23.10 - 21.11
Schütze | 22.11 - 21.12
Wassermann | 20.01 - 18.02
Fische | 19.02 - 20.03
";

fn listing_html() -> String {
    let row = |slug: &str, name: &str| {
        format!(
            r#"<tr><td><a href="/wiki/Flag"><img alt=""></a> <a href="/wiki/{}">{}</a></td><td>1</td></tr>"#,
            slug, name
        )
    };
    format!(
        r#"<html><body><table class="wikitable sortable">
<tr><th>Driver</th><th>Starts</th></tr>
{}
{}
{}
{}
<tr><td><a href="/wiki/Flag">x</a><a href="/w/index.php?title=Ghost&amp;redlink=1">Ghost Driver</a></td><td>0</td></tr>
<tr><td>Flagless Driver</td><td>0</td></tr>
{}
</table></body></html>"#,
        row("Loeb", "Sébastien Loeb"),
        row("Ogier", "Sébastien Ogier"),
        row("Tanak", "Ott Tänak"),
        row("Broken", "Broken Profile"),
        row("Makinen", "Tommi Mäkinen"),
    )
}

fn profile(bday: &str) -> String {
    format!(
        r#"<html><body><table class="infobox"><tr><th>Born</th><td><span style="display:none">(<span class="bday">{}</span>)</span></td></tr></table></body></html>"#,
        bday
    )
}

fn write_config(dir: &TempDir, server: &MockServer, table_name: &str) -> Result<TomlConfig> {
    let table_path = dir.path().join(table_name);
    let content = format!(
        r#"
[pipeline]
name = "integration"

[source]
listing_url = "{}"
timeout_seconds = 5
retry_attempts = 2
retry_delay_ms = 10

[classification]
range_table = "{}"

[report]
unit_label = "Fahrer"
show_heading = false
"#,
        server.url("/wiki/List_of_drivers"),
        table_path.to_str().unwrap().replace('\\', "/"),
    );
    let config_path = dir.path().join("zodiac-etl.toml");
    std::fs::write(&config_path, content)?;
    Ok(TomlConfig::from_file(&config_path)?)
}

#[tokio::test]
async fn test_end_to_end_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("zodiac.txt"), ZODIAC_TABLE)?;

    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET).path("/wiki/List_of_drivers");
        then.status(200).body(listing_html());
    });
    let profiles = [
        ("/wiki/Loeb", "1974-02-26"),
        ("/wiki/Ogier", "1983-12-17"),
        ("/wiki/Tanak", "1987-10-15"),
        ("/wiki/Makinen", "1964-06-26"),
    ];
    let profile_mocks: Vec<_> = profiles
        .iter()
        .map(|(path, bday)| {
            server.mock(|when, then| {
                when.method(GET).path(*path);
                then.status(200).body(profile(bday));
            })
        })
        .collect();
    let broken = server.mock(|when, then| {
        when.method(GET).path("/wiki/Broken");
        then.status(500);
    });
    let red_link = server.mock(|when, then| {
        when.method(GET).path("/w/index.php");
        then.status(200);
    });

    let config = write_config(&temp_dir, &server, "zodiac.txt")?;
    let storage = LocalStorage::current_dir();
    let source = WikipediaSource::from_config(&config)?;
    let pipeline = ZodiacPipeline::initialize(&storage, config, source).await?;

    let output = EtlEngine::new(pipeline).run().await?;

    listing.assert();
    for mock in &profile_mocks {
        mock.assert();
    }
    broken.assert_hits(2);
    red_link.assert_hits(0);

    // 人數相同，依第一次出現的順序
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Fische: 1 Fahrer",
            "Sébastien Loeb",
            "Schütze: 1 Fahrer",
            "Sébastien Ogier",
            "Waage: 1 Fahrer",
            "Ott Tänak",
            "Krebs: 1 Fahrer",
            "Tommi Mäkinen",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_year_end_fallback_without_table_row() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("zodiac.txt"), "h\ns\n")?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/wiki/List_of_drivers");
        then.status(200).body(
            r#"<table class="wikitable sortable"><tr><th>Driver</th></tr>
<tr><td><a href="/wiki/Flag">f</a><a href="/wiki/Winter">Winter Driver</a></td></tr>
<tr><td><a href="/wiki/Flag">f</a><a href="/wiki/Summer">Summer Driver</a></td></tr></table>"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/wiki/Winter");
        then.status(200).body(profile("1990-01-05"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/wiki/Summer");
        then.status(200).body(profile("1990-07-05"));
    });

    let config = write_config(&temp_dir, &server, "zodiac.txt")?;
    let storage = LocalStorage::current_dir();
    let source = WikipediaSource::from_config(&config)?;
    let pipeline = ZodiacPipeline::initialize(&storage, config, source).await?;

    let output = EtlEngine::new(pipeline).run().await?;
    assert_eq!(output, "Steinbock: 1 Fahrer\nWinter Driver\n");
    Ok(())
}

#[tokio::test]
async fn test_invalid_range_table_aborts_before_fetching() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("zodiac.txt"),
        "h\ns\nWidder | 21.03 - 19.04\nStier | 20.04 - 35.05\n",
    )?;

    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET).path("/wiki/List_of_drivers");
        then.status(200).body(listing_html());
    });

    let config = write_config(&temp_dir, &server, "zodiac.txt")?;
    let storage = LocalStorage::current_dir();
    let source = WikipediaSource::from_config(&config)?;
    let result = ZodiacPipeline::initialize(&storage, config, source).await;

    assert!(matches!(
        result,
        Err(EtlError::InvalidRangeEndpoint { line: 4, .. })
    ));
    listing.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_listing_failure_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("zodiac.txt"), ZODIAC_TABLE)?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/wiki/List_of_drivers");
        then.status(503);
    });

    let config = write_config(&temp_dir, &server, "zodiac.txt")?;
    let storage = LocalStorage::current_dir();
    let source = WikipediaSource::from_config(&config)?;
    let pipeline = ZodiacPipeline::initialize(&storage, config, source).await?;

    let result = EtlEngine::new(pipeline).run().await;
    assert!(matches!(result, Err(EtlError::HttpStatus { status: 503, .. })));
    Ok(())
}

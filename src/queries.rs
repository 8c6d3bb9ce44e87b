// Statement catalog for the song-play warehouse.
// Placeholders are resolved from `Config::catalog_params`.
use crate::error::LoadError;
use crate::models::{Catalog, StatementTemplate};
use std::collections::HashMap;

const STAGING_EVENTS_COPY: &str = "
    COPY staging_events
    FROM '{log_data}'
    IAM_ROLE '{iam_role_arn}'
    REGION '{region}'
    FORMAT AS JSON '{log_jsonpath}'
    TIMEFORMAT AS 'epochmillisecs';
";

const STAGING_SONGS_COPY: &str = "
    COPY staging_songs
    FROM '{song_data}'
    IAM_ROLE '{iam_role_arn}'
    REGION '{region}'
    FORMAT AS JSON 'auto';
";

const SONGPLAY_INSERT: &str = "
    INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    SELECT DISTINCT e.ts, e.user_id, e.level, s.song_id, s.artist_id, e.session_id, e.location, e.user_agent
    FROM staging_events e
    JOIN staging_songs s ON e.song = s.title AND e.artist = s.artist_name AND e.length = s.duration
    WHERE e.page = 'NextSong';
";

const USER_INSERT: &str = "
    INSERT INTO users (user_id, first_name, last_name, gender, level)
    SELECT DISTINCT user_id, first_name, last_name, gender, level
    FROM staging_events
    WHERE page = 'NextSong' AND user_id IS NOT NULL
      AND user_id NOT IN (SELECT user_id FROM users);
";

const SONG_INSERT: &str = "
    INSERT INTO songs (song_id, title, artist_id, year, duration)
    SELECT DISTINCT song_id, title, artist_id, year, duration
    FROM staging_songs
    WHERE song_id IS NOT NULL
      AND song_id NOT IN (SELECT song_id FROM songs);
";

const ARTIST_INSERT: &str = "
    INSERT INTO artists (artist_id, name, location, latitude, longitude)
    SELECT DISTINCT artist_id, artist_name, artist_location, artist_latitude, artist_longitude
    FROM staging_songs
    WHERE artist_id IS NOT NULL
      AND artist_id NOT IN (SELECT artist_id FROM artists);
";

const TIME_INSERT: &str = "
    INSERT INTO time (start_time, hour, day, week, month, year, weekday)
    SELECT DISTINCT start_time,
           EXTRACT(hour FROM start_time),
           EXTRACT(day FROM start_time),
           EXTRACT(week FROM start_time),
           EXTRACT(month FROM start_time),
           EXTRACT(year FROM start_time),
           EXTRACT(dayofweek FROM start_time)
    FROM songplays
    WHERE start_time NOT IN (SELECT start_time FROM time);
";

/// Stage-load templates in load order
pub fn copy_table_queries() -> Vec<StatementTemplate> {
    vec![
        StatementTemplate::new("staging_events", STAGING_EVENTS_COPY),
        StatementTemplate::new("staging_songs", STAGING_SONGS_COPY),
    ]
}

/// Transform-insert templates; `time` reads from `songplays`, so it runs last
pub fn insert_table_queries() -> Vec<StatementTemplate> {
    vec![
        StatementTemplate::new("songplays", SONGPLAY_INSERT),
        StatementTemplate::new("users", USER_INSERT),
        StatementTemplate::new("songs", SONG_INSERT),
        StatementTemplate::new("artists", ARTIST_INSERT),
        StatementTemplate::new("time", TIME_INSERT),
    ]
}

/// Resolve every template against `params` and build the catalog
pub fn default_catalog(params: &HashMap<String, String>) -> Result<Catalog, LoadError> {
    let render = |templates: Vec<StatementTemplate>| {
        templates
            .iter()
            .map(|t| t.render(params))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(Catalog::new(
        render(copy_table_queries())?,
        render(insert_table_queries())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> HashMap<String, String> {
        [
            ("log_data", "s3://udacity-dend/log_data"),
            ("log_jsonpath", "s3://udacity-dend/log_json_path.json"),
            ("song_data", "s3://udacity-dend/song_data"),
            ("region", "us-west-2"),
            ("iam_role_arn", "arn:aws:iam::123456789012:role/dwhRole"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_default_catalog_resolves_all_placeholders() {
        let catalog = default_catalog(&params()).unwrap();

        assert_eq!(catalog.stage_statements().len(), 2);
        assert_eq!(catalog.insert_statements().len(), 5);

        let events = &catalog.stage_statements()[0];
        assert_eq!(events.name(), "staging_events");
        assert!(events.sql().contains("FROM 's3://udacity-dend/log_data'"));
        assert!(events.sql().contains("IAM_ROLE 'arn:aws:iam::123456789012:role/dwhRole'"));
        assert!(events.sql().contains("JSON 's3://udacity-dend/log_json_path.json'"));

        for statement in catalog.stage_statements().iter().chain(catalog.insert_statements()) {
            assert!(!statement.sql().contains('{'), "unresolved: {}", statement.name());
        }
    }

    #[test]
    fn test_insert_order_puts_time_after_songplays() {
        let names: Vec<String> = insert_table_queries()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["songplays", "users", "songs", "artists", "time"]);
    }

    #[test]
    fn test_default_catalog_missing_param() {
        let mut params = params();
        params.remove("iam_role_arn");

        let result = default_catalog(&params);
        assert!(matches!(result, Err(LoadError::Template(_))));
    }
}

use std::error::Error;
use zim_trim::config::Config;
use zim_trim::playback::{SongRef, playable_url, stream_url};

pub fn handle_stream_url(reference: &str, filename: bool, no_bust: bool) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    let song = if filename {
        SongRef::from_stored(None, Some(reference))
    } else {
        SongRef::from_stored(Some(reference), None)
    }
    .ok_or("A song id or filename is required")?;

    let url = if no_bust {
        stream_url(&config.api_base_url, &song)?
    } else {
        playable_url(&config.api_base_url, &song)?
    };
    println!("{url}");

    Ok(())
}

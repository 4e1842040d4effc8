//! Deck builder
//!
//! Assembles the ordered candidate deck for a swipe session. Card order is
//! significant: `swipe_results[i]` downstream corresponds to the i-th
//! candidate dealt here.

use tracing::info;

use crate::config::AppConfig;
use crate::db::tables::GenreTable;
use crate::error::Result;
use crate::models::{Candidate, Mode, User};
use crate::platform::PlatformApi;
use crate::recommend::CandidateProvider;

/// Build the swipe deck for a session
pub async fn build_deck<P, R>(
    platform: &P,
    recommender: &R,
    user: &User,
    mode: Mode,
) -> Result<Vec<Candidate>>
where
    P: PlatformApi,
    R: CandidateProvider,
{
    let deck: Vec<Candidate> = match mode {
        Mode::Songs => {
            let ids = recommender.recommended_tracks(user).await?;
            let tracks = platform.get_tracks(&ids).await?;
            tracks
                .into_iter()
                .map(|track| {
                    let display_name = if track.artist_names.is_empty() {
                        track.title
                    } else {
                        format!("{} - {}", track.artist_names.join(", "), track.title)
                    };
                    Candidate {
                        id: track.id,
                        display_name,
                        image_url: track.image_url,
                        genres: Vec::new(),
                    }
                })
                .collect()
        }
        Mode::Artists => {
            let ids = recommender.random_artists(&user.platform_id).await?;
            let artists = platform.get_artists(&ids).await?;
            artists
                .into_iter()
                .map(|artist| Candidate {
                    id: artist.id,
                    display_name: artist.name,
                    image_url: artist.image_url,
                    genres: artist.genres,
                })
                .collect()
        }
        Mode::Genres => {
            let genres = GenreTable::all(AppConfig::get().deck_size).await?;
            genres
                .into_iter()
                .map(|genre| Candidate {
                    id: genre.id,
                    display_name: genre.name,
                    image_url: genre.image,
                    genres: Vec::new(),
                })
                .collect()
        }
    };

    info!("built {} deck with {} candidates", mode, deck.len());
    Ok(deck)
}

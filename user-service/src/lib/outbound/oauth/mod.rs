pub mod spotify;

pub use spotify::SpotifyFederator;

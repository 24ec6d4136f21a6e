use serde::{Deserialize, Serialize};

/// The three public datasets the chart was designed around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dataset {
    Kickstarter,
    Movies,
    VideoGames,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Kickstarter, Dataset::Movies, Dataset::VideoGames];

    pub fn url(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "https://cdn.rawgit.com/freeCodeCamp/testable-projects-fcc/a80ce8f9/src/data/tree_map/kickstarter-funding-data.json",
            Dataset::Movies => "https://cdn.rawgit.com/freeCodeCamp/testable-projects-fcc/a80ce8f9/src/data/tree_map/movie-data.json",
            Dataset::VideoGames => "https://cdn.rawgit.com/freeCodeCamp/testable-projects-fcc/a80ce8f9/src/data/tree_map/video-game-sales-data.json",
        }
    }

    /// The `name` of the dataset's root node.
    pub fn root_name(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "Kickstarter",
            Dataset::Movies => "Movies",
            Dataset::VideoGames => "Video Game Sales Data Top 100",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "Kickstarter Pledges",
            Dataset::Movies => "Movie Sales",
            Dataset::VideoGames => "Video Game Sales",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category",
            Dataset::Movies => "Top 100 Highest Grossing Movies Grouped By Genre",
            Dataset::VideoGames => "Top 100 Most Sold Video Games Grouped by Platform",
        }
    }

    pub fn from_root_name(name: &str) -> Option<Dataset> {
        Self::ALL.into_iter().find(|d| d.root_name() == name)
    }
}

/// Title and description for a hierarchy whose root is called `root_name`.
/// Unknown data is titled after its root and has no description.
pub fn heading_for(root_name: &str) -> (String, String) {
    match Dataset::from_root_name(root_name) {
        Some(d) => (d.title().to_string(), d.description().to_string()),
        None => (root_name.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roots_map_to_headings() {
        assert_eq!(
            heading_for("Video Game Sales Data Top 100"),
            (
                "Video Game Sales".to_string(),
                "Top 100 Most Sold Video Games Grouped by Platform".to_string()
            )
        );
        assert_eq!(Dataset::from_root_name("Movies"), Some(Dataset::Movies));
    }

    #[test]
    fn unknown_root_uses_its_name() {
        assert_eq!(heading_for("Budget"), ("Budget".to_string(), String::new()));
    }
}

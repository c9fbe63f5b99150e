//! Property tests for the combination search.

mod search_props;

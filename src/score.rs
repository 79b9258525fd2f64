use crate::game::food::SpecialKind;

/// Points for a normal food
const FOOD_VALUE: u32 = 10;

/// Points granted per level on reaching a new level
const LEVEL_BONUS: u32 = 50;

/// Foods (of any kind) per level
const FOODS_PER_LEVEL: u32 = 10;

/// Result of scoring one eaten food
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Scored {
    /// Points awarded for the food itself, after the multiplier
    pub(crate) points: u32,
    /// Set when this food pushed the session into a new level
    pub(crate) new_level: Option<u32>,
}

/// Per-session score, combo, and level tracking.  Persistence lives in
/// [`crate::highscores`]; this type never touches the filesystem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScoreBoard {
    score: u32,
    level: u32,
    combo: u32,
    max_combo: u32,
    foods_eaten: u32,
    specials_eaten: u32,
    play_time: f32,
    multiplier: f32,
}

impl ScoreBoard {
    pub(crate) fn new() -> ScoreBoard {
        ScoreBoard {
            score: 0,
            level: 1,
            combo: 0,
            max_combo: 0,
            foods_eaten: 0,
            specials_eaten: 0,
            play_time: 0.0,
            multiplier: 1.0,
        }
    }

    pub(crate) fn update(&mut self, dt: f32) {
        self.play_time += dt;
    }

    /// Record an eaten food.  `special` is `None` for normal food.
    pub(crate) fn add_food_score(&mut self, special: Option<SpecialKind>) -> Scored {
        let base = match special {
            None => FOOD_VALUE,
            Some(kind) => kind.points(),
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let points = (base as f32 * self.multiplier).round() as u32;
        self.score += points;

        match special {
            None => self.foods_eaten += 1,
            Some(_) => self.specials_eaten += 1,
        }

        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        if self.combo >= 5 {
            self.score += (self.combo / 5) * 10;
        }

        let new_level = self.update_level();
        Scored { points, new_level }
    }

    fn update_level(&mut self) -> Option<u32> {
        let total = self.foods_eaten + self.specials_eaten;
        let level = 1 + total / FOODS_PER_LEVEL;
        if level > self.level {
            self.level = level;
            self.score += (level - 1) * LEVEL_BONUS;
            Some(level)
        } else {
            None
        }
    }

    pub(crate) fn break_combo(&mut self) {
        self.combo = 0;
    }

    pub(crate) fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn combo(&self) -> u32 {
        self.combo
    }

    pub(crate) fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub(crate) fn play_time(&self) -> f32 {
        self.play_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(None, 10)]
    #[case(Some(SpecialKind::Golden), 50)]
    #[case(Some(SpecialKind::Speed), 30)]
    #[case(Some(SpecialKind::Slow), 20)]
    #[case(Some(SpecialKind::Reverse), 20)]
    #[case(Some(SpecialKind::Shield), 30)]
    #[case(Some(SpecialKind::Magnet), 30)]
    fn base_values(#[case] kind: Option<SpecialKind>, #[case] points: u32) {
        let mut board = ScoreBoard::new();
        let scored = board.add_food_score(kind);
        assert_eq!(scored.points, points);
        assert_eq!(board.score(), points);
    }

    #[test]
    fn multiplier_doubles_points() {
        let mut board = ScoreBoard::new();
        board.set_multiplier(2.0);
        let scored = board.add_food_score(None);
        assert_eq!(scored.points, 20);
        board.set_multiplier(1.0);
        let scored = board.add_food_score(None);
        assert_eq!(scored.points, 10);
    }

    #[test]
    fn combo_bonus_every_five() {
        let mut board = ScoreBoard::new();
        for _ in 0..4 {
            board.add_food_score(None);
        }
        assert_eq!(board.score(), 40);
        // Fifth food: 10 points plus a (5/5)*10 combo bonus
        board.add_food_score(None);
        assert_eq!(board.score(), 60);
        assert_eq!(board.combo(), 5);
        board.break_combo();
        assert_eq!(board.combo(), 0);
    }

    #[test]
    fn level_up_at_ten_foods() {
        let mut board = ScoreBoard::new();
        for i in 0..9 {
            let scored = board.add_food_score(None);
            assert_eq!(scored.new_level, None, "unexpected level-up at food {i}");
        }
        let scored = board.add_food_score(None);
        assert_eq!(scored.new_level, Some(2));
        assert_eq!(board.level(), 2);
        // 10 foods * 10 points + combo bonuses at 5..=10 + level bonus 50
        let combo_bonus: u32 = (5..=10).map(|c| (c / 5) * 10).sum();
        assert_eq!(board.score(), 100 + combo_bonus + 50);
    }

    #[test]
    fn specials_count_toward_level() {
        let mut board = ScoreBoard::new();
        for _ in 0..5 {
            board.add_food_score(None);
            board.add_food_score(Some(SpecialKind::Golden));
        }
        assert_eq!(board.level(), 2);
    }
}

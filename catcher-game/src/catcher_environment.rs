use std::fmt::{Display, Formatter};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ql_experiment::prelude::{Action, Environment};

/// TOP / LEFT corner is 0/0
pub const SCREEN_WIDTH: u32 = 64;
pub const SCREEN_HEIGHT: u32 = 80;

const PADDLE_WIDTH: i32 = 12;
const PADDLE_HEIGHT: i32 = 3;
const PADDLE_TOP_Y: i32 = 74;
const PADDLE_SPEED: i32 = 2;

const FRUIT_SIZE: i32 = 4;
const FRUIT_SPEED: i32 = 1;

pub const INITIAL_LIVES: i32 = 3;

const REWARD_CATCH: f32 = 1.0;
const REWARD_MISS: f32 = -1.0;

const GRAY_BACKGROUND: u8 = 0;
const GRAY_FRUIT: u8 = 160;
const GRAY_PADDLE: u8 = 255;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CatcherAction {
    Left,
    Right,
    Noop,
}

impl Display for CatcherAction {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            CatcherAction::Left => f.write_str("←"),
            CatcherAction::Right => f.write_str("→"),
            CatcherAction::Noop => f.write_str("o"),
        }
    }
}

impl Action for CatcherAction {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fruit {
    x: i32,
    y: i32,
}

/// Catcher: a paddle at the bottom of the screen catches fruit falling from the top.
///
/// - Each caught fruit is rewarded with +1, each missed one costs a life and -1.
/// - The game is over when all lives are gone.
/// - One [Environment::act] call advances the game by one frame.
pub struct CatcherEnvironment {
    rng: StdRng,
    paddle_x: i32,
    fruit: Fruit,
    lives: i32,
    displaying: bool,
}

impl CatcherEnvironment {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fruit = Self::spawn_fruit(&mut rng);
        Self {
            rng,
            paddle_x: (SCREEN_WIDTH as i32 - PADDLE_WIDTH) / 2,
            fruit,
            lives: INITIAL_LIVES,
            displaying: false,
        }
    }

    fn spawn_fruit(rng: &mut StdRng) -> Fruit {
        Fruit {
            x: rng.gen_range(0..=SCREEN_WIDTH as i32 - FRUIT_SIZE),
            y: 0,
        }
    }

    fn move_paddle(
        &mut self,
        action: CatcherAction,
    ) {
        let dx = match action {
            CatcherAction::Left => -PADDLE_SPEED,
            CatcherAction::Right => PADDLE_SPEED,
            CatcherAction::Noop => 0,
        };
        self.paddle_x = (self.paddle_x + dx).clamp(0, SCREEN_WIDTH as i32 - PADDLE_WIDTH);
    }

    fn fruit_over_paddle(&self) -> bool {
        self.fruit.x + FRUIT_SIZE > self.paddle_x && self.fruit.x < self.paddle_x + PADDLE_WIDTH
    }

    fn gray_value(
        &self,
        x: i32,
        y: i32,
    ) -> u8 {
        let in_rect = |left: i32, top: i32, width: i32, height: i32| x >= left && x < left + width && y >= top && y < top + height;

        if in_rect(self.paddle_x, PADDLE_TOP_Y, PADDLE_WIDTH, PADDLE_HEIGHT) {
            GRAY_PADDLE
        } else if in_rect(self.fruit.x, self.fruit.y, FRUIT_SIZE, FRUIT_SIZE) {
            GRAY_FRUIT
        } else {
            GRAY_BACKGROUND
        }
    }

    /// Coarse text rendering (every 2nd column, every 4th row)
    fn render_to_text(&self) -> String {
        let mut text = String::new();
        for y in (0..SCREEN_HEIGHT as i32).step_by(4) {
            for x in (0..SCREEN_WIDTH as i32).step_by(2) {
                text.push(match self.gray_value(x, y) {
                    GRAY_PADDLE => '=',
                    GRAY_FRUIT => 'o',
                    _ => '.',
                });
            }
            text.push('\n');
        }
        text
    }
}

impl Environment for CatcherEnvironment {
    type A = CatcherAction;

    fn reset(&mut self) -> Result<()> {
        self.paddle_x = (SCREEN_WIDTH as i32 - PADDLE_WIDTH) / 2;
        self.fruit = Self::spawn_fruit(&mut self.rng);
        self.lives = INITIAL_LIVES;
        Ok(())
    }

    fn no_action(&self) -> Self::A { CatcherAction::Noop }

    fn act(
        &mut self,
        action: Self::A,
    ) -> Result<f32> {
        if self.game_over() {
            return Ok(0.0);
        }

        self.move_paddle(action);
        self.fruit.y += FRUIT_SPEED;

        let mut reward = 0.0;
        if self.fruit.y + FRUIT_SIZE >= PADDLE_TOP_Y {
            if self.fruit_over_paddle() {
                reward = REWARD_CATCH;
            } else {
                reward = REWARD_MISS;
                self.lives -= 1;
                log::trace!("fruit missed, {} lives left", self.lives);
            }
            self.fruit = Self::spawn_fruit(&mut self.rng);
        }

        if self.displaying {
            log::trace!("\n{}", self.render_to_text());
        }
        Ok(reward)
    }

    fn game_over(&self) -> bool { self.lives <= 0 }

    fn lives(&self) -> i32 { self.lives }

    fn screen_dims(&self) -> (u32, u32) { (SCREEN_WIDTH, SCREEN_HEIGHT) }

    fn grayscale_screen(&self) -> Result<Vec<u8>> {
        let mut screen = Vec::with_capacity((SCREEN_WIDTH * SCREEN_HEIGHT) as usize);
        for x in 0..SCREEN_WIDTH as i32 {
            for y in 0..SCREEN_HEIGHT as i32 {
                screen.push(self.gray_value(x, y));
            }
        }
        Ok(screen)
    }

    fn legal_actions(&self) -> Vec<Self::A> { vec![CatcherAction::Left, CatcherAction::Right, CatcherAction::Noop] }

    fn set_display_screen(
        &mut self,
        display: bool,
    ) {
        self.displaying = display;
    }
}

//! Hidden-state navigation controller.
//!
//! The navigator never sees the grid: it knows only the stream of
//! `OK <x> <y>` acknowledgements the robot returns after every movement
//! command, and from those it must infer where the robot is, which way it
//! faces, and where the obstacles are.
//!
//! # Pose inference
//!
//! Position and heading start unknown. The first forward move's
//! acknowledgement establishes a position; the first acknowledgement that
//! *changes* the position after a forward move fixes the heading from the
//! sign of the single-axis delta. A coordinate-unchanged forward move
//! while the heading is still unknown means the cell ahead is blocked:
//! the navigator turns right and probes again until a delta appears.
//!
//! # Planning
//!
//! Motion is axis-aligned with a fixed axis order: `|x|` is reduced to
//! zero first, then `|y|`. Reorientation uses the minimum number of 90°
//! turns; a 180° reversal is always two right turns.
//!
//! A blocked cell on the way is routed around with a fixed bypass: one
//! cell perpendicular (to the right), two cells forward past the obstacle,
//! rejoin the line, restore the heading. The one exception is an obstacle
//! sitting on the target column while the robot still travels along the x
//! axis. Rejoining there would overshoot the column and oscillate, so the
//! navigator instead dodges one cell toward the origin row and turns the
//! corner early.
//!
//! Every acknowledgement is checked against the origin before anything
//! else, so arrivals in the middle of a bypass (or on the last budgeted
//! step) are honored immediately.
//!
//! # Budgets
//!
//! Successful forward moves spend from the step budget; failed ones count
//! against the obstacle limit. Exhausting either ends the session without
//! a response.

use rover_core::{Coords, Error, Heading, Result};
use rover_protocol::ServerMessage;
use std::collections::VecDeque;

/// Movement command the navigator can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move,
    TurnLeft,
    TurnRight,
}

impl From<Command> for ServerMessage {
    fn from(command: Command) -> Self {
        match command {
            Command::Move => ServerMessage::Move,
            Command::TurnLeft => ServerMessage::TurnLeft,
            Command::TurnRight => ServerMessage::TurnRight,
        }
    }
}

/// Outcome of feeding one acknowledgement to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Send this command next.
    Command(Command),
    /// The robot stands on the origin; pick up the secret.
    Arrived,
}

/// What the navigator believes about the robot's pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Belief {
    /// No acknowledgement seen yet.
    Unknown,
    /// Position known, heading not yet inferred.
    Position(Coords),
    /// Position and heading known.
    Full { coords: Coords, heading: Heading },
}

/// Deterministic controller steering one robot to the origin.
#[derive(Debug)]
pub struct Navigator {
    belief: Belief,
    last_command: Command,
    /// Queued commands (probe and bypass sequences) served before planning.
    plan: VecDeque<Command>,
    steps_remaining: u32,
    obstacle_hits: u32,
    max_obstacle_hits: u32,
}

impl Navigator {
    #[must_use]
    pub fn new(max_steps: u32, max_obstacle_hits: u32) -> Self {
        Self {
            belief: Belief::Unknown,
            last_command: Command::Move,
            plan: VecDeque::new(),
            steps_remaining: max_steps,
            obstacle_hits: 0,
            max_obstacle_hits,
        }
    }

    /// The opening command of every session: a blind forward move that
    /// produces the first position report.
    pub fn first_command(&mut self) -> Command {
        self.last_command = Command::Move;
        Command::Move
    }

    /// Forward moves still available.
    #[must_use]
    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    /// Failed forward moves seen so far.
    #[must_use]
    pub fn obstacle_hits(&self) -> u32 {
        self.obstacle_hits
    }

    /// Digest one `OK` acknowledgement and decide what happens next.
    ///
    /// # Errors
    ///
    /// - `Error::Syntax` if the reported coordinates cannot follow from
    ///   any single move (diagonal jump after a forward move).
    /// - `Error::ObstacleLimit` / `Error::OutOfSteps` when a budget is
    ///   exhausted away from the origin.
    pub fn observe(&mut self, coords: Coords) -> Result<Step> {
        self.apply_ack(coords)?;

        if coords.is_origin() {
            return Ok(Step::Arrived);
        }
        if self.obstacle_hits > self.max_obstacle_hits {
            return Err(Error::ObstacleLimit {
                hits: self.obstacle_hits,
            });
        }
        if self.steps_remaining == 0 {
            return Err(Error::OutOfSteps);
        }

        let next = match self.plan.pop_front() {
            Some(queued) => queued,
            None => self.plan_step(),
        };
        self.last_command = next;
        Ok(Step::Command(next))
    }

    /// Update the pose belief and budgets from an acknowledgement.
    fn apply_ack(&mut self, coords: Coords) -> Result<()> {
        match self.belief {
            Belief::Unknown => {
                // First report: establishes position. Whether the move
                // actually happened is undetectable, so nothing is spent.
                self.belief = Belief::Position(coords);
            }
            Belief::Position(prev) => match self.last_command {
                Command::Move => {
                    if coords == prev {
                        self.obstacle_hits += 1;
                        self.plan.clear();
                        self.plan.extend([Command::TurnRight, Command::Move]);
                    } else {
                        let heading = Heading::from_step(prev, coords)?;
                        self.belief = Belief::Full { coords, heading };
                        self.steps_remaining = self.steps_remaining.saturating_sub(1);
                    }
                }
                // Probe turns report the unchanged position; the heading
                // stays unknown until a move produces a delta.
                Command::TurnLeft | Command::TurnRight => {
                    self.belief = Belief::Position(coords);
                }
            },
            Belief::Full { coords: prev, heading } => match self.last_command {
                Command::Move => {
                    if coords == prev {
                        self.obstacle_hits += 1;
                        self.plan.clear();
                        self.queue_bypass(prev, heading);
                    } else {
                        self.belief = Belief::Full { coords, heading };
                        self.steps_remaining = self.steps_remaining.saturating_sub(1);
                    }
                }
                Command::TurnLeft => {
                    self.belief = Belief::Full {
                        coords,
                        heading: heading.turned_left(),
                    };
                }
                Command::TurnRight => {
                    self.belief = Belief::Full {
                        coords,
                        heading: heading.turned_right(),
                    };
                }
            },
        }
        Ok(())
    }

    /// Queue the detour around the cell blocking a forward move.
    fn queue_bypass(&mut self, position: Coords, heading: Heading) {
        let blocked = position.step(heading);

        if heading.is_horizontal() && blocked.x == 0 {
            // The obstacle occupies the target column. Rejoining the row
            // behind it would overshoot the column and the planner would
            // approach the same cell from the far side forever. Dodge one
            // cell toward the origin row instead; the next leg turns down
            // the column beside the obstacle.
            let side = if position.y > 0 {
                Heading::South
            } else {
                Heading::North
            };
            if heading.turned_right() == side {
                self.plan
                    .extend([Command::TurnRight, Command::Move, Command::TurnLeft]);
            } else {
                self.plan
                    .extend([Command::TurnLeft, Command::Move, Command::TurnRight]);
            }
        } else {
            // Canonical bypass: one cell perpendicular, two cells forward
            // (one per flank of the obstacle), rejoin, restore heading.
            self.plan.extend([
                Command::TurnRight,
                Command::Move,
                Command::TurnLeft,
                Command::Move,
                Command::Move,
                Command::TurnLeft,
                Command::Move,
                Command::TurnRight,
            ]);
        }
    }

    /// Choose the next command from the current belief.
    fn plan_step(&self) -> Command {
        match self.belief {
            // Still probing for a coordinate delta.
            Belief::Unknown | Belief::Position(_) => Command::Move,
            Belief::Full { coords, heading } => {
                let desired = Self::desired_heading(coords);
                match heading.right_turns_to(desired) {
                    0 => Command::Move,
                    3 => Command::TurnLeft,
                    // One right turn, or a reversal done as two rights.
                    _ => Command::TurnRight,
                }
            }
        }
    }

    /// Direction of progress: reduce `|x|` to zero first, then `|y|`.
    fn desired_heading(coords: Coords) -> Heading {
        if coords.x > 0 {
            Heading::West
        } else if coords.x < 0 {
            Heading::East
        } else if coords.y > 0 {
            Heading::South
        } else {
            Heading::North
        }
    }
}

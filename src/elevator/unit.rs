/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::shared::{Direction, TargetUpdate, UnitEvent};

/***************************************/
/*               Enums                 */
/***************************************/

/// What a unit should do given its floor and queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Arrived(u8),
    Moving(u8),
}

/**
 * Motion state machine of a single elevator.
 *
 * The unit keeps its own floor counter and the latest target queue pushed by
 * the dispatch controller. It re-evaluates whenever the queue head changes:
 *
 * - Idle:      queue empty, block until a new queue arrives.
 * - Arrived:   floor equals the head, report `Arrive` at once.
 * - Moving:    wait one tick, step one floor toward the head, report `Move`.
 *
 * A head change cancels the pending tick and the next one is scheduled from
 * scratch. After every report the unit waits for the controller's
 * acknowledging update before doing anything else, so at most one report per
 * unit is in flight.
 *
 * # Fields
 * - `id`:          Elevator id, equal to its index in the fleet.
 * - `floor`:       Local floor counter, reported upstream on each step.
 * - `targets`:     Latest target queue from the controller, ascending.
 * - `tick`:        Time between two steps.
 * - `target_rx`:   Receives target queues from the controller.
 * - `event_tx`:    Sends Move/Arrive notifications to the controller.
 */
pub struct ElevatorUnit {
    id: usize,
    floor: u8,
    targets: Vec<u8>,
    tick: Duration,

    // Controller channels
    target_rx: cbc::Receiver<TargetUpdate>,
    event_tx: cbc::Sender<UnitEvent>,
}

/***************************************/
/*             Public API              */
/***************************************/
impl ElevatorUnit {
    pub fn new(
        id: usize,
        config: &ElevatorConfig,
        target_rx: cbc::Receiver<TargetUpdate>,
        event_tx: cbc::Sender<UnitEvent>,
    ) -> ElevatorUnit {
        ElevatorUnit {
            id,
            floor: 0,
            targets: Vec::new(),
            tick: config.tick(),
            target_rx,
            event_tx,
        }
    }

    pub fn run(mut self) {
        debug!("Elevator unit {} started", self.id);

        // Deadline of the next step, None while no step is scheduled
        let mut next_tick: Option<Instant> = None;

        // Main loop, left when the controller disconnects
        loop {
            let running = match motion(self.floor, &self.targets) {
                Motion::Idle => {
                    next_tick = None;
                    match self.target_rx.recv() {
                        Ok(update) => {
                            self.apply_update(update, &mut next_tick);
                            true
                        }
                        Err(_) => false,
                    }
                }

                Motion::Arrived(head) => {
                    next_tick = None;
                    info!("Elevator unit {} reached floor {}", self.id, head);
                    self.report(
                        UnitEvent::Arrive {
                            id: self.id,
                            floor: head,
                        },
                        &mut next_tick,
                    )
                }

                Motion::Moving(head) => {
                    let deadline = *next_tick.get_or_insert_with(|| Instant::now() + self.tick);
                    match self.target_rx.recv_deadline(deadline) {
                        Ok(update) => {
                            self.apply_update(update, &mut next_tick);
                            true
                        }
                        Err(cbc::RecvTimeoutError::Timeout) => {
                            let (floor, direction) = step_toward(self.floor, head);
                            self.floor = floor;
                            next_tick = Some(deadline + self.tick);
                            self.report(
                                UnitEvent::Move {
                                    id: self.id,
                                    floor,
                                    direction,
                                },
                                &mut next_tick,
                            )
                        }
                        Err(cbc::RecvTimeoutError::Disconnected) => false,
                    }
                }
            };

            if !running {
                break;
            }
        }

        debug!("Elevator unit {} stopped", self.id);
    }

    // Send a notification and hold until the controller has applied it.
    // Returns false once the controller is gone.
    fn report(&mut self, event: UnitEvent, next_tick: &mut Option<Instant>) -> bool {
        if self.event_tx.send(event).is_err() {
            return false;
        }

        loop {
            match self.target_rx.recv() {
                Ok(update) => {
                    let ack = update.ack;
                    self.apply_update(update, next_tick);
                    if ack {
                        return true;
                    }
                }
                Err(_) => return false,
            }
        }
    }

    fn apply_update(&mut self, update: TargetUpdate, next_tick: &mut Option<Instant>) {
        if update.targets.first() != self.targets.first() {
            // New head: restart motion towards it
            *next_tick = None;
        }
        self.targets = update.targets;
    }
}

/***************************************/
/*       Transition functions          */
/***************************************/
pub fn motion(floor: u8, targets: &[u8]) -> Motion {
    match targets.first() {
        None => Motion::Idle,
        Some(&head) if head == floor => Motion::Arrived(head),
        Some(&head) => Motion::Moving(head),
    }
}

/// One step from `floor` toward `head`.
///
/// The returned direction is what is still needed after the step: `Up` while
/// the new floor is below the head, otherwise `Down`. Reaching the head from
/// below therefore reports `Down`.
pub fn step_toward(floor: u8, head: u8) -> (u8, Direction) {
    let new_floor = if floor < head { floor + 1 } else { floor - 1 };
    let direction = if new_floor < head {
        Direction::Up
    } else {
        Direction::Down
    };
    (new_floor, direction)
}

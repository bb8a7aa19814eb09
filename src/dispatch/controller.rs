/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatch::assigner;
use crate::shared::{FleetEvent, FleetState, TargetUpdate, UnitEvent};

/***************************************/
/*               Enums                 */
/***************************************/

/// Requests from the outside world, kept on one channel so a snapshot always
/// reflects every call issued before it.
pub enum Command {
    Call(u8),
    Snapshot(cbc::Sender<FleetState>),
    Terminate,
}

enum Event {
    CallRequested(u8),
    SnapshotRequested(cbc::Sender<FleetState>),
    UnitReport(UnitEvent),
    Terminate,
}

/**
 * Owns the fleet and applies every change to it.
 *
 * The controller is the single writer of `FleetState`. It runs one event loop
 * fed by two channels: commands from the `Dispatcher` handle and notifications
 * from the elevator units. Each event is turned into a whole-state transform
 * from `assigner`, and the result replaces the previous state.
 *
 * # Fields
 * - `fleet`:               Authoritative state of every elevator.
 * - `command_rx`:          Receives calls, snapshot requests and termination.
 * - `unit_event_rx`:       Receives Move/Arrive notifications from the units.
 * - `unit_target_txs`:     One target queue channel per unit, indexed by id.
 * - `fleet_event_tx`:      Publishes fleet activity to observers.
 */
pub struct DispatchController {
    fleet: FleetState,

    command_rx: cbc::Receiver<Command>,
    unit_event_rx: cbc::Receiver<UnitEvent>,
    unit_target_txs: Vec<cbc::Sender<TargetUpdate>>,
    fleet_event_tx: cbc::Sender<FleetEvent>,
}

/***************************************/
/*             Public API              */
/***************************************/
impl DispatchController {
    pub fn new(
        fleet: FleetState,
        command_rx: cbc::Receiver<Command>,
        unit_event_rx: cbc::Receiver<UnitEvent>,
        unit_target_txs: Vec<cbc::Sender<TargetUpdate>>,
        fleet_event_tx: cbc::Sender<FleetEvent>,
    ) -> DispatchController {
        DispatchController {
            fleet,
            command_rx,
            unit_event_rx,
            unit_target_txs,
            fleet_event_tx,
        }
    }

    pub fn run(mut self) {
        info!(
            "Dispatch controller started: {} floors, {} elevators",
            self.fleet.n_floors,
            self.fleet.elevators.len()
        );

        // Main loop
        loop {
            match self.wait_for_event() {
                Event::Terminate => break,
                event => self.handle_event(event),
            }
        }

        // Dropping the target senders here disconnects the units
        info!("Dispatch controller terminated");
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::CallRequested(floor) => self.call_elevator(floor),

            Event::SnapshotRequested(reply_tx) => {
                if reply_tx.send(self.fleet.clone()).is_err() {
                    debug!("Snapshot requester went away before the reply");
                }
            }

            Event::UnitReport(UnitEvent::Move {
                id,
                floor,
                direction,
            }) => {
                if self.fleet.get(id).is_none() {
                    warn!("Move reported by unknown elevator {}", id);
                    return;
                }
                debug!("Elevator {} at floor {}, heading {}", id, floor, direction);

                self.fleet = assigner::apply_move(&self.fleet, id, floor, direction);
                self.publish(FleetEvent::Moved {
                    id,
                    floor,
                    direction,
                });
                self.send_targets(id, true);
            }

            Event::UnitReport(UnitEvent::Arrive { id, floor }) => {
                if self.fleet.get(id).is_none() {
                    warn!("Arrival reported by unknown elevator {}", id);
                    return;
                }
                info!("Elevator {} arrived at floor {}", id, floor);

                self.fleet = assigner::apply_arrival(&self.fleet, id, floor);
                self.publish(FleetEvent::Arrived { id, floor });
                self.send_targets(id, true);
            }

            Event::Terminate => {}
        }
    }

    fn wait_for_event(&self) -> Event {
        cbc::select! {
            // Handling requests from the handle
            recv(self.command_rx) -> command => {
                match command {
                    Ok(Command::Call(floor)) => Event::CallRequested(floor),
                    Ok(Command::Snapshot(reply_tx)) => Event::SnapshotRequested(reply_tx),
                    Ok(Command::Terminate) => Event::Terminate,
                    Err(_) => {
                        debug!("Every dispatcher handle dropped, stopping");
                        Event::Terminate
                    }
                }
            },

            // Handling unit notifications
            recv(self.unit_event_rx) -> report => {
                match report {
                    Ok(report) => Event::UnitReport(report),
                    Err(_) => {
                        warn!("Every elevator unit stopped, stopping");
                        Event::Terminate
                    }
                }
            },
        }
    }

    fn call_elevator(&mut self, floor: u8) {
        match assigner::assign_call(&self.fleet, floor) {
            Ok((next, Some(id))) => {
                info!("Call to floor {} assigned to elevator {}", floor, id);
                self.fleet = next;
                self.publish(FleetEvent::Assigned { floor, id });
                self.send_targets(id, false);
            }
            Ok((_, None)) => {
                debug!("No elevator can take the call to floor {}, dropped", floor);
                self.publish(FleetEvent::Dropped { floor });
            }
            // Dispatcher checks floors up front; this covers raw Command senders
            Err(e) => {
                warn!("Rejected call: {}", e);
                self.publish(FleetEvent::Rejected { floor });
            }
        }
    }

    // Push the current queue of one elevator to its unit
    fn send_targets(&self, id: usize, ack: bool) {
        let (Some(elevator), Some(target_tx)) = (self.fleet.get(id), self.unit_target_txs.get(id))
        else {
            return;
        };

        let update = TargetUpdate {
            targets: elevator.target_floors.clone(),
            ack,
        };
        if target_tx.send(update).is_err() {
            warn!("Elevator unit {} is not running", id);
        }
    }

    // Observers are optional; a full or closed channel just loses the event
    fn publish(&self, event: FleetEvent) {
        let _ = self.fleet_event_tx.try_send(event);
    }
}

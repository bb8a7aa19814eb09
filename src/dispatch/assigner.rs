/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, DispatchError, ElevatorState, FleetState};

/*
 * Fleet transitions.
 *
 * Every mutation of the fleet is a whole-state transform: the functions below
 * take the current `FleetState` by reference and return the next one. The
 * dispatch controller is the only caller and swaps the result in.
 *
 * Elevator selection runs in two phases:
 * - Idle first: among elevators with an empty queue, the one closest to the
 *   called floor.
 * - Fallback: among elevators whose direction passes the called floor on the
 *   way (`Up` from at or below, `Down` from at or above), the closest one.
 *
 * Ties go to the lowest id. If neither phase yields a candidate the call is
 * dropped.
 */

/***************************************/
/*             Public API              */
/***************************************/
pub fn select_elevator(fleet: &FleetState, floor: u8) -> Option<usize> {
    closest(fleet.elevators.iter().filter(|e| e.is_idle()), floor).or_else(|| {
        closest(
            fleet.elevators.iter().filter(|e| passes_floor(e, floor)),
            floor,
        )
    })
}

/// Assigns `floor` to the selected elevator. `Ok((next, None))` means the call
/// was dropped and `next` equals the input.
pub fn assign_call(
    fleet: &FleetState,
    floor: u8,
) -> Result<(FleetState, Option<usize>), DispatchError> {
    if floor >= fleet.n_floors {
        return Err(DispatchError::InvalidFloor {
            floor,
            floors: fleet.n_floors,
        });
    }

    let Some(winner) = select_elevator(fleet, floor) else {
        return Ok((fleet.clone(), None));
    };

    let next = update_elevator(fleet, winner, |elevator| {
        let mut target_floors = elevator.target_floors.clone();
        target_floors.push(floor);
        target_floors.sort_unstable();

        // A non-empty queue never pairs with `Idle`
        let direction = match elevator.direction {
            Direction::Idle => heading(elevator.current_floor, target_floors[0]),
            direction => direction,
        };

        ElevatorState {
            target_floors,
            direction,
            ..elevator.clone()
        }
    });

    Ok((next, Some(winner)))
}

pub fn apply_move(fleet: &FleetState, id: usize, floor: u8, direction: Direction) -> FleetState {
    update_elevator(fleet, id, |elevator| ElevatorState {
        current_floor: floor,
        direction,
        ..elevator.clone()
    })
}

/// Removes one occurrence of `floor` and re-derives the direction from the new
/// head. A floor that is not queued leaves the elevator untouched.
pub fn apply_arrival(fleet: &FleetState, id: usize, floor: u8) -> FleetState {
    update_elevator(fleet, id, |elevator| {
        let Some(position) = elevator.target_floors.iter().position(|&f| f == floor) else {
            return elevator.clone();
        };

        let mut target_floors = elevator.target_floors.clone();
        target_floors.remove(position);

        let direction = match target_floors.first() {
            None => Direction::Idle,
            Some(&head) => heading(floor, head),
        };

        ElevatorState {
            target_floors,
            direction,
            ..elevator.clone()
        }
    })
}

/***************************************/
/*          Private functions          */
/***************************************/
fn closest<'a>(candidates: impl Iterator<Item = &'a ElevatorState>, floor: u8) -> Option<usize> {
    // min_by_key keeps the first of equal keys, and the registry is in id order
    candidates
        .min_by_key(|e| e.current_floor.abs_diff(floor))
        .map(|e| e.id)
}

fn passes_floor(elevator: &ElevatorState, floor: u8) -> bool {
    match elevator.direction {
        Direction::Up => elevator.current_floor <= floor,
        Direction::Down => elevator.current_floor >= floor,
        Direction::Idle => false,
    }
}

fn heading(from: u8, head: u8) -> Direction {
    if head > from {
        Direction::Up
    } else {
        Direction::Down
    }
}

fn update_elevator<F>(fleet: &FleetState, id: usize, update: F) -> FleetState
where
    F: Fn(&ElevatorState) -> ElevatorState,
{
    FleetState {
        n_floors: fleet.n_floors,
        elevators: fleet
            .elevators
            .iter()
            .map(|e| if e.id == id { update(e) } else { e.clone() })
            .collect(),
    }
}

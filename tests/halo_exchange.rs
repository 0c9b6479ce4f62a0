//! Ghost-layer exchange across block connections.

use hyperlu::core::{FieldView, HaloExchange};
use hyperlu::core::VarArray;
use hyperlu::error::RelaxError;
use hyperlu::grid::{BlockFace, Connection, Extents, Patch, UnknownField};
use hyperlu::parallel::LocalHalo;

fn tagged(e: Extents, ghosts: usize, block: usize) -> UnknownField {
    let mut x = UnknownField::zeros(e, ghosts, 1, 1);
    for c in e.cells() {
        let id = (1000 * block + 100 * c.k + 10 * c.j + c.i) as f64;
        x.insert_block(c, &VarArray::from_vec(vec![id, -id], 1));
    }
    x
}

#[test]
fn two_layers_across_a_k_face() {
    let e = Extents::new(2, 3, 4);
    let mut fields = vec![tagged(e, 2, 0), tagged(e, 2, 1)];
    let conn = Connection::new(Patch::new(0, 1, BlockFace::KMin), Patch::new(0, 0, BlockFace::KMax));
    LocalHalo.exchange(&mut fields, &[conn], 0, 2).unwrap();

    for j in 0..3 {
        for i in 0..2 {
            // block 1 below k = 0 sees block 0's top layers, nearest first
            assert_eq!(fields[1].at(i, j, -1)[0], (300 + 10 * j + i) as f64);
            assert_eq!(fields[1].at(i, j, -2)[0], (200 + 10 * j + i) as f64);
            assert_eq!(fields[0].at(i, j, 4)[0], (1000 + 10 * j + i) as f64);
            assert_eq!(fields[0].at(i, j, 5)[1], -((1100 + 10 * j + i) as f64));
        }
    }
}

#[test]
fn exchange_is_idempotent_and_leaves_physical_cells() {
    let e = Extents::new(3, 2, 2);
    let mut fields = vec![tagged(e, 1, 0), tagged(e, 1, 1)];
    let physical: Vec<_> = fields.iter().map(|f| f.get_copy(hyperlu::grid::CellIndex::new(2, 1, 1))).collect();
    let conns = [Connection::new(Patch::new(3, 0, BlockFace::JMax), Patch::new(3, 1, BlockFace::JMin))];
    LocalHalo.exchange(&mut fields, &conns, 3, 1).unwrap();
    let once = fields.clone();
    LocalHalo.exchange(&mut fields, &conns, 3, 1).unwrap();
    assert_eq!(fields, once);
    for (f, p) in fields.iter().zip(&physical) {
        assert_eq!(&f.get_copy(hyperlu::grid::CellIndex::new(2, 1, 1)), p);
    }
}

#[test]
fn zero_ghost_width_is_a_no_op() {
    let e = Extents::new(2, 2, 2);
    let mut fields = vec![tagged(e, 1, 0)];
    let before = fields.clone();
    let conn = Connection::new(Patch::new(0, 0, BlockFace::IMin), Patch::new(1, 0, BlockFace::IMax));
    LocalHalo.exchange(&mut fields, &[conn], 0, 0).unwrap();
    assert_eq!(fields, before);
}

#[test]
fn shallow_block_cannot_donate() {
    let mut fields = vec![tagged(Extents::new(1, 2, 2), 2, 0), tagged(Extents::new(3, 2, 2), 2, 1)];
    let conn = Connection::new(Patch::new(0, 0, BlockFace::IMax), Patch::new(0, 1, BlockFace::IMin));
    let err = LocalHalo.exchange(&mut fields, &[conn], 0, 2).unwrap_err();
    assert!(matches!(err, RelaxError::HaloExchange(msg) if msg.contains("2 layers requested")));
}

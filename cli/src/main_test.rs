use super::*;

fn triangle(id: u64, x: f64) -> Piece {
    Piece::generated(id, vec![Point::new(x, 0.0), Point::new(x + 10.0, 0.0), Point::new(x, 10.0)])
}

#[test]
fn written_snapshot_reads_back_through_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pieces.json");
    let pieces = vec![triangle(0, 0.0), triangle(2, 50.0).with_offset(Point::new(3.0, 4.0))];

    write_snapshot(&path, &pieces).unwrap();

    let back = decode_pieces(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let ids: Vec<u64> = back.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![0, 2]);
    assert_eq!(back[1].offset, Point::new(3.0, 4.0));
    assert_eq!(back[1].points, pieces[1].points);
}

#[test]
fn write_snapshot_reports_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("pieces.json");
    let err = write_snapshot(&path, &[triangle(0, 0.0)]).unwrap_err();
    assert!(matches!(err, CliError::Write { .. }));
    assert!(err.to_string().starts_with("cannot write"));
}
